use dotboy_common::app::App;
use dotboy_common::key::Key;

use crate::{GameBoy, SCREEN_HEIGHT, SCREEN_SCALE, SCREEN_WIDTH};

/// Idle updates between repeated "no frame" warnings.
const IDLE_WARN_INTERVAL: u32 = 600;

/// Frontend-facing wrapper implementing the shared [`App`] trait.
///
/// Each `update` runs the machine to the next frame and converts it to
/// RGB24. When the CPU stops producing frames (STOP or an invalid opcode)
/// the last picture stays on screen.
#[derive(Default)]
pub struct GameBoyApp {
    pub gb: GameBoy,
    quit: bool,
    updates: u64,
    frames_shown: u64,
    /// Consecutive updates that produced no frame.
    idle: u32,
}

impl GameBoyApp {
    pub fn new(gb: GameBoy) -> Self {
        Self {
            gb,
            ..Self::default()
        }
    }

    /// Frames drawn into the screen so far.
    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }

    fn report_idle(&self) {
        let cpu = &self.gb.cpu;
        log::warn!(
            "GB: no frame for {} update(s) at pc=0x{:04X} (stopped={} locked={})",
            self.idle,
            cpu.regs.pc,
            cpu.is_stopped(),
            cpu.is_locked(),
        );
    }
}

impl App for GameBoyApp {
    fn init(&mut self) {
        log::info!(
            "GB: init at pc=0x{:04X} boot_rom={}",
            self.gb.cpu.regs.pc,
            self.gb.bus().boot_rom_enabled()
        );
    }

    fn update(&mut self, screen: &mut [u8]) {
        self.updates += 1;

        let Some(frame) = self.gb.step_frame() else {
            self.idle = self.idle.saturating_add(1);
            if self.idle == 1 || self.idle % IDLE_WARN_INTERVAL == 0 {
                self.report_idle();
            }
            return;
        };

        self.idle = 0;
        self.frames_shown += 1;
        frame.write_rgb24(screen);

        if frame.number() == 1 || frame.number() % 60 == 0 {
            let gpu = self.gb.gpu();
            log::debug!(
                "GB: frame {} pc=0x{:04X} ime={} halted={} lcdc=0x{:02X} scx={} scy={}",
                frame.number(),
                self.gb.cpu.regs.pc,
                self.gb.cpu.ime,
                self.gb.cpu.halted,
                gpu.lcdc().bits(),
                gpu.scx(),
                gpu.scy(),
            );
        }
    }

    fn handle_key_event(&mut self, key: Key, is_down: bool) {
        match key {
            Key::Escape if is_down => self.quit = true,
            _ => self.gb.handle_key(key, is_down),
        }
    }

    fn should_exit(&self) -> bool {
        self.quit
    }

    fn exit(&mut self) {
        log::info!(
            "GB: exit after {} updates, {} frames shown, {} serial bytes",
            self.updates,
            self.frames_shown,
            self.gb.serial_output().len()
        );
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        SCREEN_SCALE
    }

    fn title(&self) -> String {
        "dotboy".to_string()
    }
}

#[cfg(test)]
mod tests;
