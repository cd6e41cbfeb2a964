use std::path::Path;

use anyhow::{bail, Context};
use dotboy_common::key::Key;

use super::bus::REGISTER_DEFAULTS;
use super::{Button, MemoryBus, BOOT_ROM_SIZE, ROM_SIZE};
use crate::cpu::{Cpu, Interrupt};
use crate::gpu::{Frame, Gpu};
use crate::instruction::{Decoded, Decoder};

/// High-level Game Boy machine.
///
/// Holds the CPU core and the bus. One [`tick`](GameBoy::tick) runs one CPU
/// step, brings the GPU up to date and then services interrupts.
#[derive(Clone, Debug)]
pub struct GameBoy {
    pub cpu: Cpu,
    pub(crate) bus: MemoryBus,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    pub fn new() -> Self {
        let mut gb = Self {
            cpu: Cpu::new(),
            bus: MemoryBus::default(),
        };
        gb.reset();
        gb
    }

    /// Power-cycle. The loaded ROM and boot image survive.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
        for (addr, value) in REGISTER_DEFAULTS {
            self.write8(addr, value);
        }
        if !self.bus.boot_rom_enabled() {
            self.cpu.apply_post_boot_state();
        }
        log::debug!(
            "reset: pc=0x{:04X} boot_rom={}",
            self.cpu.regs.pc,
            self.bus.boot_rom_enabled()
        );
    }

    /// Map a cartridge image and reset. Only the first 32 KiB are mapped.
    ///
    /// On error the machine is left untouched.
    pub fn load_rom(&mut self, rom: &[u8]) -> anyhow::Result<()> {
        if rom.is_empty() {
            bail!("ROM image is empty");
        }
        if rom.len() > ROM_SIZE {
            log::warn!(
                "ROM is {} bytes; only the first {} are mapped (no bank switching)",
                rom.len(),
                ROM_SIZE
            );
        }
        self.bus.load_rom(rom);
        self.reset();
        log::info!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    pub fn load_rom_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let rom = std::fs::read(path)
            .with_context(|| format!("failed to read ROM '{}'", path.display()))?;
        self.load_rom(&rom)
            .with_context(|| format!("failed to load ROM '{}'", path.display()))
    }

    /// Install a 256-byte boot image and reset so it runs from 0x0000.
    pub fn load_boot_rom(&mut self, image: &[u8]) -> anyhow::Result<()> {
        if image.len() != BOOT_ROM_SIZE {
            bail!(
                "boot ROM must be {} bytes, got {}",
                BOOT_ROM_SIZE,
                image.len()
            );
        }
        self.bus.install_boot_rom(image);
        self.reset();
        log::info!("boot ROM installed");
        Ok(())
    }

    /// Read through the CPU's view of the address space.
    pub fn read8(&mut self, addr: u16) -> u8 {
        self.cpu.read8(&mut self.bus, addr)
    }

    pub fn write8(&mut self, addr: u16, value: u8) {
        self.cpu.write8(&mut self.bus, addr, value);
    }

    /// CPU step, GPU update, interrupt pass. Returns the cycles consumed,
    /// 0 when the CPU is stopped or locked.
    pub fn tick(&mut self) -> u32 {
        let cycles = self.cpu.step(&mut self.bus);
        self.bus.update_gpu(self.cpu.cycles());
        let requested = self.bus.gpu.take_interrupts();
        if !requested.is_empty() {
            self.cpu.interrupts.request(requested);
        }
        cycles + self.cpu.handle_interrupts(&mut self.bus)
    }

    /// Tick until the GPU completes a frame.
    ///
    /// Returns `None` if the CPU stops making progress first (STOP or an
    /// invalid opcode).
    pub fn step_frame(&mut self) -> Option<Frame> {
        loop {
            if self.tick() == 0 {
                return None;
            }
            if let Some(frame) = self.bus.gpu.take_frame() {
                return Some(frame);
            }
        }
    }

    /// The last completed frame not yet taken, for callers driving `tick`.
    pub fn take_frame(&mut self) -> Option<Frame> {
        self.bus.gpu.take_frame()
    }

    /// Press or release a button. A press requests the joypad interrupt
    /// and wakes the CPU from STOP.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        if self.bus.joypad.set(button, pressed) {
            log::debug!("button {:?} pressed", button);
            self.cpu.interrupts.request(Interrupt::JOYPAD);
            self.cpu.resume();
        }
    }

    /// Map a frontend key onto the joypad.
    ///
    /// - Arrow keys => D-pad
    /// - Z => A, X => B
    /// - A => Select, S => Start
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        let button = match key {
            Key::Right => Button::Right,
            Key::Left => Button::Left,
            Key::Up => Button::Up,
            Key::Down => Button::Down,
            Key::Z => Button::A,
            Key::X => Button::B,
            Key::A => Button::Select,
            Key::S => Button::Start,
            _ => return,
        };
        self.set_button(button, pressed);
    }

    /// Bytes written to the serial port since reset.
    pub fn serial_output(&self) -> &[u8] {
        self.bus.serial.output()
    }

    pub fn gpu(&self) -> &Gpu {
        &self.bus.gpu
    }

    pub fn bus(&self) -> &MemoryBus {
        &self.bus
    }

    /// Decode the instruction at PC without executing it.
    pub fn disassemble_next(&mut self) -> Decoded {
        Decoder::new(&self.cpu, &mut self.bus).decode()
    }
}
