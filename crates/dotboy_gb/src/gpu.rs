//! Pixel processing unit.
//!
//! Owns VRAM, the decoded tile cache, palettes and the LCD registers. The
//! machine calls [`Gpu::update`] with the CPU's absolute cycle count after
//! each instruction; the GPU walks its mode state machine over the elapsed
//! cycles, renders a scanline on each VRAM to HBlank transition and hands
//! a finished [`Frame`] out at the start of VBlank.
//!
//! Interrupt requests are queued and drained by the owner with
//! [`Gpu::take_interrupts`].

use dotboy_common::Color;

use crate::cpu::Interrupt;
use crate::io;
use crate::memory::MemoryRegion;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

mod registers;
mod render;
mod tiles;

pub use registers::{LcdControl, LcdStatus, Mode, Palette, StatFlags};
pub use render::SpriteFlags;
pub use tiles::{Tile, TileCache, TILE_COUNT};

pub const VRAM_BASE: u16 = 0x8000;
pub const VRAM_SIZE: usize = 0x2000;
/// End (exclusive) of tile data; the tile maps follow.
const TILE_DATA_END: u16 = 0x9800;

/// LY value on which VBlank starts.
pub const VBLANK_LINE: u8 = 143;
/// Last line of VBlank before wrapping to 0.
pub const LAST_LINE: u8 = 153;

/// Display shades from lightest to darkest, as `0xAARRGGBB`.
pub const SHADES: [u32; 4] = [
    Color::new_rgb(0xDD, 0xDD, 0xDD).to_argb(),
    Color::new_rgb(0xAA, 0xAA, 0xAA).to_argb(),
    Color::new_rgb(0x55, 0x55, 0x55).to_argb(),
    Color::new_rgb(0x00, 0x00, 0x00).to_argb(),
];

/// A completed 160x144 picture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    number: u64,
    pixels: Box<[u32]>,
}

impl Frame {
    pub const WIDTH: usize = SCREEN_WIDTH;
    pub const HEIGHT: usize = SCREEN_HEIGHT;

    /// Frames delivered since reset, starting at 1.
    #[inline]
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Row-major `0xAARRGGBB` pixels.
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * Self::WIDTH + x]
    }

    /// Convert into packed RGB24. Stops early if `out` is short.
    pub fn write_rgb24(&self, out: &mut [u8]) {
        for (pixel, rgb) in self.pixels.iter().zip(out.chunks_exact_mut(3)) {
            let (r, g, b) = Color::from_argb(*pixel).rgb();
            rgb.copy_from_slice(&[r, g, b]);
        }
    }

    pub fn to_rgb24(&self) -> Vec<u8> {
        let mut out = vec![0; self.pixels.len() * 3];
        self.write_rgb24(&mut out);
        out
    }
}

#[derive(Clone, Debug)]
pub struct Gpu {
    vram: MemoryRegion,
    tiles: TileCache,
    lcdc: LcdControl,
    stat: LcdStatus,
    scy: u8,
    scx: u8,
    ly: u8,
    lyc: u8,
    bg_palette: Palette,
    sprite_palettes: [Palette; 2],
    /// Cycles accumulated in the current mode.
    clock: u64,
    last_cycles: u64,
    framebuffer: Box<[u32]>,
    frame: Option<Frame>,
    frames: u64,
    requests: Interrupt,
}

impl Default for Gpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Gpu {
    pub fn new() -> Self {
        let mut gpu = Self {
            vram: MemoryRegion::new(VRAM_BASE, VRAM_SIZE),
            tiles: TileCache::default(),
            lcdc: LcdControl::empty(),
            stat: LcdStatus::default(),
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bg_palette: Palette::default(),
            sprite_palettes: [Palette::default(); 2],
            clock: 0,
            last_cycles: 0,
            framebuffer: vec![SHADES[0]; SCREEN_WIDTH * SCREEN_HEIGHT].into_boxed_slice(),
            frame: None,
            frames: 0,
            requests: Interrupt::empty(),
        };
        gpu.check_coincidence();
        gpu
    }

    /// Return to power-on state without reallocating.
    pub fn reset(&mut self) {
        self.vram.reset();
        self.tiles.reset();
        self.lcdc = LcdControl::empty();
        self.stat = LcdStatus::default();
        self.scy = 0;
        self.scx = 0;
        self.ly = 0;
        self.lyc = 0;
        self.bg_palette = Palette::default();
        self.sprite_palettes = [Palette::default(); 2];
        self.clock = 0;
        self.last_cycles = 0;
        self.framebuffer.fill(SHADES[0]);
        self.frame = None;
        self.frames = 0;
        self.requests = Interrupt::empty();
        self.check_coincidence();
    }

    /// Advance to the CPU's absolute cycle count `cycles`.
    ///
    /// `oam` is sprite attribute memory, read when a scanline is rendered.
    pub fn update(&mut self, cycles: u64, oam: &[u8]) {
        let delta = cycles.saturating_sub(self.last_cycles);
        self.last_cycles = cycles;
        self.clock += delta;

        loop {
            let duration = u64::from(self.stat.mode.cycles());
            if self.clock < duration {
                break;
            }
            self.clock -= duration;
            match self.stat.mode {
                Mode::HorizontalBlank => {
                    self.set_ly(self.ly.wrapping_add(1));
                    if self.ly == VBLANK_LINE {
                        self.deliver_frame();
                        self.requests |= Interrupt::VBLANK;
                        self.enter(Mode::VerticalBlank);
                    } else {
                        self.enter(Mode::ObjectAttributeMemory);
                    }
                }
                Mode::VerticalBlank => {
                    if self.ly >= LAST_LINE {
                        self.set_ly(0);
                        self.enter(Mode::ObjectAttributeMemory);
                    } else {
                        self.set_ly(self.ly + 1);
                    }
                }
                Mode::ObjectAttributeMemory => self.enter(Mode::VideoRam),
                Mode::VideoRam => {
                    self.render_scanline(oam);
                    self.enter(Mode::HorizontalBlank);
                }
            }
        }
    }

    fn enter(&mut self, mode: Mode) {
        self.stat.mode = mode;
        if self.stat.interrupt_on_entry(mode) {
            self.requests |= Interrupt::LCD_STAT;
        }
    }

    fn deliver_frame(&mut self) {
        self.frames += 1;
        log::debug!("GPU: frame {} complete", self.frames);
        self.frame = Some(Frame {
            number: self.frames,
            pixels: self.framebuffer.clone(),
        });
    }

    fn set_ly(&mut self, value: u8) {
        self.ly = value;
        self.check_coincidence();
    }

    fn set_lyc(&mut self, value: u8) {
        self.lyc = value;
        self.check_coincidence();
    }

    fn check_coincidence(&mut self) {
        let coincidence = self.ly == self.lyc;
        self.stat.flags.set(StatFlags::COINCIDENCE, coincidence);
        if coincidence && self.stat.flags.contains(StatFlags::COINCIDENCE_INTERRUPT) {
            self.requests |= Interrupt::LCD_STAT;
        }
    }

    /// Take the most recently completed frame, if one is waiting.
    pub fn take_frame(&mut self) -> Option<Frame> {
        self.frame.take()
    }

    /// Drain queued interrupt requests.
    pub fn take_interrupts(&mut self) -> Interrupt {
        std::mem::take(&mut self.requests)
    }

    #[inline]
    pub fn read_vram(&self, addr: u16) -> u8 {
        self.vram.get(addr)
    }

    pub fn write_vram(&mut self, addr: u16, value: u8) {
        self.vram.set(addr, value);
        if addr < TILE_DATA_END {
            self.tiles.update(&self.vram, addr);
        }
    }

    pub fn read_register(&self, addr: u16) -> u8 {
        match addr {
            io::LCDC => self.lcdc.bits(),
            io::STAT => self.stat.read(),
            io::SCY => self.scy,
            io::SCX => self.scx,
            io::LY => self.ly,
            io::LYC => self.lyc,
            io::BGP => self.bg_palette.register(),
            io::OBP0 => self.sprite_palettes[0].register(),
            io::OBP1 => self.sprite_palettes[1].register(),
            _ => unreachable!("not a GPU register: {addr:04X}"),
        }
    }

    pub fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            io::LCDC => {
                let lcdc = LcdControl::from_bits_retain(value);
                if lcdc.contains(LcdControl::LCD_ENABLE) != self.lcdc.contains(LcdControl::LCD_ENABLE)
                {
                    log::debug!("GPU: LCD {}", if value & 0x80 != 0 { "on" } else { "off" });
                }
                self.lcdc = lcdc;
            }
            io::STAT => self.stat.write(value),
            io::SCY => self.scy = value,
            io::SCX => self.scx = value,
            // Any write resets the line counter.
            io::LY => self.set_ly(0),
            io::LYC => self.set_lyc(value),
            io::BGP => self.bg_palette = Palette::new(value),
            io::OBP0 => self.sprite_palettes[0] = Palette::new(value),
            io::OBP1 => self.sprite_palettes[1] = Palette::new(value),
            _ => unreachable!("not a GPU register: {addr:04X}"),
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.stat.mode
    }

    #[inline]
    pub fn ly(&self) -> u8 {
        self.ly
    }

    #[inline]
    pub fn lyc(&self) -> u8 {
        self.lyc
    }

    #[inline]
    pub fn scx(&self) -> u8 {
        self.scx
    }

    #[inline]
    pub fn scy(&self) -> u8 {
        self.scy
    }

    #[inline]
    pub fn lcdc(&self) -> LcdControl {
        self.lcdc
    }

    #[inline]
    pub fn stat(&self) -> LcdStatus {
        self.stat
    }

    #[inline]
    pub fn tiles(&self) -> &TileCache {
        &self.tiles
    }

    /// The picture being drawn, including lines not yet finished.
    #[inline]
    pub fn framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }

    /// Frames delivered since reset.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests;
