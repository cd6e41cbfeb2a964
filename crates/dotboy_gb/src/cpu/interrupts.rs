use bitflags::bitflags;

use super::{Bus, Cpu};
use crate::instruction::Vector;

bitflags! {
    /// Interrupt sources as laid out in IE (0xFFFF) and IF (0xFF0F).
    ///
    /// Lower bits have higher priority.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Interrupt: u8 {
        const VBLANK = 1 << 0;
        const LCD_STAT = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

/// Cost of dispatching to an interrupt vector.
pub const INTERRUPT_CYCLES: u32 = 20;

impl Interrupt {
    pub fn vector(self) -> Vector {
        if self.contains(Interrupt::VBLANK) {
            Vector::VBlank
        } else if self.contains(Interrupt::LCD_STAT) {
            Vector::LcdStat
        } else if self.contains(Interrupt::TIMER) {
            Vector::Timer
        } else if self.contains(Interrupt::SERIAL) {
            Vector::Serial
        } else {
            Vector::Joypad
        }
    }
}

/// The IE and IF registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interrupts {
    pub enabled: u8,
    /// Only the low five bits are stored.
    pub flags: u8,
}

impl Interrupts {
    #[inline]
    pub fn request(&mut self, interrupt: Interrupt) {
        self.flags |= interrupt.bits();
    }

    /// Sources both requested and enabled.
    #[inline]
    pub fn pending(&self) -> Interrupt {
        Interrupt::from_bits_truncate(self.enabled & self.flags)
    }

    /// The single highest-priority pending source.
    pub fn highest_pending(&self) -> Option<Interrupt> {
        let pending = self.pending().bits();
        if pending == 0 {
            None
        } else {
            Interrupt::from_bits(pending & pending.wrapping_neg())
        }
    }

    #[inline]
    pub fn acknowledge(&mut self, interrupt: Interrupt) {
        self.flags &= !interrupt.bits();
    }
}

impl Cpu {
    /// Run one interrupt pass after an instruction.
    ///
    /// Dispatches at most one source, then promotes a pending EI. Returns the
    /// cycles spent on dispatch.
    /// Nothing is serviced while stopped or locked; a button press clears
    /// STOP before the next pass.
    pub fn handle_interrupts<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.stopped || self.locked {
            return 0;
        }
        let mut cycles = 0;
        if self.ime {
            if let Some(interrupt) = self.interrupts.highest_pending() {
                let vector = interrupt.vector();
                log::debug!(
                    "interrupt {:?}: vector=0x{:04X} pc=0x{:04X} IF=0x{:02X} IE=0x{:02X}",
                    interrupt,
                    vector.address(),
                    self.regs.pc,
                    self.interrupts.flags,
                    self.interrupts.enabled,
                );
                self.interrupts.acknowledge(interrupt);
                self.ime = false;
                self.ime_scheduled = false;
                self.halted = false;
                self.restart(bus, vector);
                self.advance(INTERRUPT_CYCLES);
                cycles = INTERRUPT_CYCLES;
            }
        }

        if self.ime_scheduled {
            self.ime_scheduled = false;
            self.ime = true;
        }
        cycles
    }
}
