use super::{Joypad, Serial, BOOT_ROM_SIZE, ROM_SIZE};
use crate::cpu::Bus;
use crate::gpu::Gpu;
use crate::io;
use crate::memory::MemoryRegion;

mod dma;
mod init;

pub(super) use init::REGISTER_DEFAULTS;

const CART_RAM_BASE: u16 = 0xA000;
const WRAM_BASE: u16 = 0xC000;
const RAM_SIZE: usize = 0x2000;
/// 0xE000-0xFDFF mirrors work RAM.
const SHADOW_OFFSET: u16 = 0x2000;
const OAM_BASE: u16 = 0xFE00;
/// Bytes of OAM holding the 40 sprite entries.
pub const OAM_USED: usize = 0xA0;
const HRAM_BASE: u16 = 0xFF80;
const IO_BASE: u16 = 0xFF00;

/// Everything on the CPU's address bus except the registers the CPU owns
/// (timer, IF, IE).
///
/// Dispatch is a single exhaustive match over the address, so every
/// address has exactly one owner.
#[derive(Clone, Debug)]
pub struct MemoryBus {
    boot_rom: MemoryRegion,
    has_boot_rom: bool,
    boot_enabled: bool,
    rom: MemoryRegion,
    cart_ram: MemoryRegion,
    wram: MemoryRegion,
    oam: MemoryRegion,
    hram: MemoryRegion,
    /// Backing store for I/O addresses without dedicated handling.
    io: MemoryRegion,
    pub gpu: Gpu,
    pub joypad: Joypad,
    pub serial: Serial,
}

impl Default for MemoryBus {
    fn default() -> Self {
        let mut bus = Self {
            boot_rom: MemoryRegion::new(0x0000, BOOT_ROM_SIZE),
            has_boot_rom: false,
            boot_enabled: false,
            rom: MemoryRegion::new(0x0000, ROM_SIZE),
            cart_ram: MemoryRegion::new(CART_RAM_BASE, RAM_SIZE),
            wram: MemoryRegion::new(WRAM_BASE, RAM_SIZE),
            oam: MemoryRegion::new(OAM_BASE, 0x100),
            hram: MemoryRegion::new(HRAM_BASE, 0x7F),
            io: MemoryRegion::new(IO_BASE, 0x100),
            gpu: Gpu::new(),
            joypad: Joypad::default(),
            serial: Serial::default(),
        };
        bus.reset();
        bus
    }
}

impl MemoryBus {
    /// Clear RAM and devices. The cartridge ROM and boot image are kept
    /// and the boot overlay is re-enabled if one is installed.
    pub fn reset(&mut self) {
        self.boot_enabled = self.has_boot_rom;
        self.cart_ram.reset();
        self.wram.reset();
        self.oam.reset();
        self.hram.reset();
        self.apply_io_reset();
        self.gpu.reset();
        self.joypad.reset();
        self.serial.reset();
    }

    /// Map `rom` at 0x0000. Bytes past 32 KiB are dropped.
    pub(super) fn load_rom(&mut self, rom: &[u8]) {
        self.rom.load(rom);
    }

    pub(super) fn install_boot_rom(&mut self, image: &[u8]) {
        self.boot_rom.load(image);
        self.has_boot_rom = true;
    }

    #[inline]
    pub fn boot_rom_enabled(&self) -> bool {
        self.boot_enabled
    }

    /// Bring the GPU up to the CPU's absolute cycle count.
    pub(super) fn update_gpu(&mut self, cycles: u64) {
        self.gpu.update(cycles, self.oam.slice(OAM_BASE, OAM_USED));
    }

    pub fn oam(&self) -> &[u8] {
        self.oam.slice(OAM_BASE, OAM_USED)
    }
}

impl Bus for MemoryBus {
    fn read8(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x00FF if self.boot_enabled => self.boot_rom.get(addr),
            0x0000..=0x7FFF => self.rom.get(addr),
            0x8000..=0x9FFF => self.gpu.read_vram(addr),
            0xA000..=0xBFFF => self.cart_ram.get(addr),
            0xC000..=0xDFFF => self.wram.get(addr),
            0xE000..=0xFDFF => self.wram.get(addr - SHADOW_OFFSET),
            0xFE00..=0xFEFF => self.oam.get(addr),
            io::P1 => self.joypad.read(),
            io::SB | io::SC => self.serial.read(addr),
            io::LCDC..=io::LYC | io::BGP..=io::OBP1 => self.gpu.read_register(addr),
            0xFF80..=0xFFFE => self.hram.get(addr),
            0xFF00..=0xFFFF => self.io.get(addr),
        }
    }

    fn write8(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => {
                log::trace!("ignored ROM write 0x{value:02X} to 0x{addr:04X}");
            }
            0x8000..=0x9FFF => self.gpu.write_vram(addr, value),
            0xA000..=0xBFFF => self.cart_ram.set(addr, value),
            0xC000..=0xDFFF => self.wram.set(addr, value),
            0xE000..=0xFDFF => self.wram.set(addr - SHADOW_OFFSET, value),
            0xFE00..=0xFEFF => self.oam.set(addr, value),
            io::P1 => self.joypad.write(value),
            io::SB | io::SC => self.serial.write(addr, value),
            io::LCDC..=io::LYC | io::BGP..=io::OBP1 => self.gpu.write_register(addr, value),
            io::DMA => {
                self.io.set(addr, value);
                self.oam_dma(value);
            }
            io::BOOT => {
                self.io.set(addr, value);
                if value & 0x01 != 0 && self.boot_enabled {
                    log::debug!("boot ROM disabled");
                    self.boot_enabled = false;
                }
            }
            0xFF80..=0xFFFE => self.hram.set(addr, value),
            0xFF00..=0xFFFF => self.io.set(addr, value),
        }
    }
}
