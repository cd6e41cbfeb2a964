mod alu;
mod exec;
mod interrupts;
mod regs;
mod timer;

pub use interrupts::{Interrupt, Interrupts};
pub use regs::{Flag, Reg16, Reg8, Registers};
pub use timer::Timer;

use crate::bits;
use crate::instruction::{Decoded, Decoder};
use crate::io;

/// Abstraction over the Game Boy bus (memory and IO).
///
/// The CPU owns the timer and interrupt registers and intercepts their
/// addresses itself; every other access goes through this trait.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}

/// Game Boy CPU core.
///
/// Holds the register file, the timer block and the interrupt controller.
/// Memory is reached through a [`Bus`] passed into each call.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub timer: Timer,
    pub interrupts: Interrupts,
    pub ime: bool,
    /// Set by EI; promoted to `ime` at the end of the next interrupt pass.
    ime_scheduled: bool,
    pub halted: bool,
    stopped: bool,
    /// Set after executing an undefined opcode. `step` does nothing until
    /// reset.
    locked: bool,
    cycles: u64,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            timer: Timer::default(),
            interrupts: Interrupts::default(),
            ime: false,
            ime_scheduled: false,
            halted: false,
            stopped: false,
            locked: false,
            cycles: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Registers as the DMG boot ROM leaves them when it jumps to the
    /// cartridge at 0x0100. Used when no boot image is installed.
    pub fn apply_post_boot_state(&mut self) {
        self.regs.set_af(0x01B0);
        self.regs.set_bc(0x0013);
        self.regs.set_de(0x00D8);
        self.regs.set_hl(0x014D);
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;
        self.ime = false;
    }

    /// Total clock cycles elapsed since reset.
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Leave the STOP state. Called when a button is pressed.
    pub fn resume(&mut self) {
        if self.stopped {
            log::debug!("CPU resumed from STOP at PC={:04X}", self.regs.pc);
        }
        self.stopped = false;
    }

    #[inline]
    pub fn flag(&self, flag: Flag) -> bool {
        self.regs.flag(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        self.regs.set_flag(flag, value);
    }

    /// Execute one instruction and return the number of cycles it took.
    ///
    /// Returns 0 while stopped or locked. While halted, burns 4 cycles per
    /// call until an enabled interrupt is pending.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.stopped || self.locked {
            return 0;
        }

        if self.halted {
            if self.interrupts.pending().is_empty() {
                self.advance(4);
                return 4;
            }
            self.halted = false;
            if self.ime {
                // The following interrupt pass dispatches before the next
                // instruction runs.
                self.advance(4);
                return 4;
            }
        }

        let Decoded {
            operation,
            cycles,
            length,
        } = Decoder::new(self, bus).decode();
        log::trace!("{:04X}: {}", self.regs.pc, operation);

        self.regs.pc = self.regs.pc.wrapping_add(length);
        self.execute(bus, &operation);
        self.advance(cycles);
        cycles
    }

    /// Advance the cycle counter and the timer.
    pub(crate) fn advance(&mut self, cycles: u32) {
        self.cycles += u64::from(cycles);
        self.timer.advance(cycles, &mut self.interrupts);
    }

    /// Read through the CPU's view of memory: timer, IF and IE live here,
    /// everything else is forwarded to the bus.
    pub fn read8<B: Bus>(&self, bus: &mut B, addr: u16) -> u8 {
        match addr {
            io::DIV..=io::TAC => self.timer.read(addr),
            // Upper three bits of IF are unused and read as 1.
            io::IF => self.interrupts.flags | 0xE0,
            io::IE => self.interrupts.enabled,
            _ => bus.read8(addr),
        }
    }

    pub fn write8<B: Bus>(&mut self, bus: &mut B, addr: u16, value: u8) {
        match addr {
            io::DIV..=io::TAC => self.timer.write(addr, value),
            io::IF => self.interrupts.flags = value & 0x1F,
            io::IE => self.interrupts.enabled = value,
            _ => bus.write8(addr, value),
        }
    }

    /// SP is decremented before each byte; the high byte lands at the
    /// higher address.
    pub(crate) fn push<B: Bus>(&mut self, bus: &mut B, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write8(bus, self.regs.sp, bits::high_byte(value));
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write8(bus, self.regs.sp, bits::low_byte(value));
    }

    pub(crate) fn pop<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let low = self.read8(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let high = self.read8(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        bits::word(high, low)
    }
}
