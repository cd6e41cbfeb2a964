use crate::cpu::{Bus, Cpu, Reg16};

impl Cpu {
    pub(super) fn exec_push<B: Bus>(&mut self, bus: &mut B, reg: Reg16) {
        let value = self.regs.get16(reg);
        self.push(bus, value);
    }

    /// POP AF masks the low nibble of F through `set16`.
    pub(super) fn exec_pop<B: Bus>(&mut self, bus: &mut B, reg: Reg16) {
        let value = self.pop(bus);
        self.regs.set16(reg, value);
    }
}
