use super::{Interrupt, Interrupts};
use crate::io;

/// DIV/TIMA/TMA/TAC.
///
/// Both counters are driven by an internal 16-bit divider; DIV is its
/// high byte. Writing DIV clears the whole divider, so the next DIV and
/// TIMA edges are a full period away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    divider: u16,
    pub tima: u8,
    pub tma: u8,
    /// Only the low three bits are stored.
    pub tac: u8,
}

impl Timer {
    #[inline]
    pub fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// The DIV register.
    #[inline]
    pub fn div(&self) -> u8 {
        (self.divider >> 8) as u8
    }

    /// Cycles per TIMA increment for the current TAC clock select.
    pub fn period(&self) -> u64 {
        match self.tac & 0x03 {
            0b00 => 1024,
            0b01 => 16,
            0b10 => 64,
            _ => 256,
        }
    }

    /// Run the divider forward by `cycles`.
    pub fn advance(&mut self, cycles: u32, interrupts: &mut Interrupts) {
        // Every period divides 0x10000, so counting edges on the unwrapped
        // value is exact across divider wrap.
        let before = u64::from(self.divider);
        let after = before + u64::from(cycles);
        self.divider = after as u16;

        if !self.enabled() {
            return;
        }

        let period = self.period();
        let ticks = after / period - before / period;
        if ticks == 0 {
            return;
        }
        let mut counter = u64::from(self.tima) + ticks;
        while counter > 0xFF {
            // Reload from TMA; the overshoot keeps counting from there.
            counter = counter - 0x100 + u64::from(self.tma);
            interrupts.request(Interrupt::TIMER);
        }
        self.tima = counter as u8;
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            io::DIV => self.div(),
            io::TIMA => self.tima,
            io::TMA => self.tma,
            // Bits 3-7 of TAC read as 1.
            io::TAC => self.tac | 0xF8,
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            io::DIV => self.divider = 0,
            io::TIMA => self.tima = value,
            io::TMA => self.tma = value,
            io::TAC => self.tac = value & 0x07,
            _ => {}
        }
    }
}
