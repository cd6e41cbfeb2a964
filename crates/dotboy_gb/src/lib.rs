pub mod app;
pub mod bits;
pub mod cpu;
pub mod gpu;
pub mod instruction;
pub mod io;
pub mod machine;
pub mod memory;
pub mod runner;

pub use app::GameBoyApp;
pub use machine::{Button, GameBoy};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
/// Default integer scaling factor for windowed frontends.
pub const SCREEN_SCALE: u32 = 4;
