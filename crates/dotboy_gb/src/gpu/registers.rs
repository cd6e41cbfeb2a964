use bitflags::bitflags;

use super::SHADES;

bitflags! {
    /// LCDC (0xFF40).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        const BG_ENABLE = 1 << 0;
        const OBJ_ENABLE = 1 << 1;
        /// 8x16 sprites.
        const OBJ_TALL = 1 << 2;
        /// Background map at 0x9C00 instead of 0x9800.
        const BG_TILE_MAP = 1 << 3;
        /// Tile data at 0x8000 with unsigned ids. When clear, ids below 128
        /// address the block at 0x9000.
        const TILE_DATA_UNSIGNED = 1 << 4;
        const WINDOW_ENABLE = 1 << 5;
        const WINDOW_TILE_MAP = 1 << 6;
        const LCD_ENABLE = 1 << 7;
    }
}

impl LcdControl {
    #[inline]
    pub fn bg_tile_map(self) -> u16 {
        if self.contains(LcdControl::BG_TILE_MAP) {
            0x9C00
        } else {
            0x9800
        }
    }

    #[inline]
    pub fn sprite_height(self) -> i16 {
        if self.contains(LcdControl::OBJ_TALL) {
            16
        } else {
            8
        }
    }

    /// Map a background tile id to an index into the 384-tile cache.
    #[inline]
    pub fn tile_index(self, id: u8) -> usize {
        if !self.contains(LcdControl::TILE_DATA_UNSIGNED) && id < 128 {
            id as usize + 256
        } else {
            id as usize
        }
    }
}

/// PPU mode as reported in STAT bits 0-1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    HorizontalBlank = 0,
    VerticalBlank = 1,
    ObjectAttributeMemory = 2,
    VideoRam = 3,
}

impl Mode {
    /// Cycles spent in this mode (per line for VBlank).
    pub const fn cycles(self) -> u32 {
        match self {
            Mode::HorizontalBlank => 204,
            Mode::VerticalBlank => 456,
            Mode::ObjectAttributeMemory => 80,
            Mode::VideoRam => 172,
        }
    }
}

bitflags! {
    /// STAT (0xFF41) bits 2-6.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct StatFlags: u8 {
        /// LY == LYC. Read-only.
        const COINCIDENCE = 1 << 2;
        const HBLANK_INTERRUPT = 1 << 3;
        const VBLANK_INTERRUPT = 1 << 4;
        const OAM_INTERRUPT = 1 << 5;
        const COINCIDENCE_INTERRUPT = 1 << 6;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LcdStatus {
    pub mode: Mode,
    pub flags: StatFlags,
}

impl LcdStatus {
    const WRITABLE: u8 = 0x78;

    /// Bit 7 is unused and reads as 1.
    pub fn read(&self) -> u8 {
        0x80 | self.flags.bits() | self.mode as u8
    }

    /// Only the interrupt enables (bits 3-6) are writable.
    pub fn write(&mut self, value: u8) {
        let coincidence = self.flags & StatFlags::COINCIDENCE;
        self.flags = coincidence | StatFlags::from_bits_truncate(value & Self::WRITABLE);
    }

    /// Whether entering `mode` raises the LCD STAT interrupt.
    pub fn interrupt_on_entry(&self, mode: Mode) -> bool {
        let flag = match mode {
            Mode::HorizontalBlank => StatFlags::HBLANK_INTERRUPT,
            Mode::VerticalBlank => StatFlags::VBLANK_INTERRUPT,
            Mode::ObjectAttributeMemory => StatFlags::OAM_INTERRUPT,
            Mode::VideoRam => return false,
        };
        self.flags.contains(flag)
    }
}

/// A 4-entry palette decoded from BGP, OBP0 or OBP1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    register: u8,
    colors: [u32; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Palette {
    /// Each two-bit field of `register` selects the shade for one index.
    pub fn new(register: u8) -> Self {
        let mut colors = [0; 4];
        for (index, color) in colors.iter_mut().enumerate() {
            *color = SHADES[(register >> (index * 2)) as usize & 0b11];
        }
        Self { register, colors }
    }

    #[inline]
    pub fn register(&self) -> u8 {
        self.register
    }

    #[inline]
    pub fn color(&self, index: u8) -> u32 {
        self.colors[index as usize & 0b11]
    }
}
