use crate::cpu::Cpu;

impl Cpu {
    pub(super) fn exec_halt(&mut self) {
        self.halted = true;
    }

    pub(super) fn exec_stop(&mut self) {
        log::debug!("STOP at PC={:04X}", self.regs.pc.wrapping_sub(1));
        self.stopped = true;
    }

    /// EI is delayed by one instruction; DI takes effect immediately and
    /// cancels a pending EI.
    pub(super) fn exec_interrupts(&mut self, enable: bool) {
        if enable {
            self.ime_scheduled = true;
        } else {
            self.ime = false;
            self.ime_scheduled = false;
        }
    }

    /// Undefined opcodes hang the real CPU. Lock until reset.
    pub(super) fn exec_invalid(&mut self, address: u16, opcode: u8) {
        log::error!("invalid opcode 0x{opcode:02X} at 0x{address:04X}; CPU locked");
        self.locked = true;
    }
}
