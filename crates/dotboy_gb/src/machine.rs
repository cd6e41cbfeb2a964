//! The assembled console: memory bus, joypad, serial port and the
//! [`GameBoy`] driver that ticks CPU and GPU together.

mod bus;
mod gameboy;
mod joypad;
mod serial;

pub use bus::MemoryBus;
pub use gameboy::GameBoy;
pub use joypad::{Button, Joypad};
pub use serial::Serial;

/// Cartridge ROM mapped at 0x0000 without bank switching.
pub const ROM_SIZE: usize = 0x8000;
/// Boot image overlaid on 0x0000-0x00FF until disabled.
pub const BOOT_ROM_SIZE: usize = 0x100;
