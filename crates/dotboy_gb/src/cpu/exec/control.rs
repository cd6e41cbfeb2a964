use crate::bits;
use crate::cpu::{Bus, Cpu};
use crate::instruction::{Condition, Operand, Vector, WordOperand};

impl Cpu {
    pub(super) fn exec_jump(&mut self, cond: Condition, target: Operand) {
        if !cond.holds(&self.regs) {
            return;
        }
        self.regs.pc = match target {
            Operand::Relative(offset) => bits::offset(self.regs.pc, offset),
            Operand::Word(WordOperand::Immediate(address))
            | Operand::Word(WordOperand::Register { value: address, .. }) => address,
            other => panic!("unsupported jump target: {other:?}"),
        };
    }

    pub(super) fn exec_call<B: Bus>(&mut self, bus: &mut B, cond: Condition, address: u16) {
        if cond.holds(&self.regs) {
            self.push(bus, self.regs.pc);
            self.regs.pc = address;
        }
    }

    pub(super) fn exec_return<B: Bus>(&mut self, bus: &mut B, cond: Condition) {
        if cond.holds(&self.regs) {
            self.regs.pc = self.pop(bus);
        }
    }

    /// RETI enables interrupts immediately, unlike EI.
    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop(bus);
        self.ime = true;
    }

    /// RST and interrupt dispatch: push PC and jump to a fixed vector.
    pub(crate) fn restart<B: Bus>(&mut self, bus: &mut B, vector: Vector) {
        self.push(bus, self.regs.pc);
        self.regs.pc = vector.address();
    }
}
