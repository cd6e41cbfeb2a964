use crate::cpu::{Bus, Cpu, Flag, Reg16};
use crate::instruction::{ByteOperand, Carry, CarryFlagOp, Operand, WordOperand};

impl Cpu {
    pub(super) fn exec_add<B: Bus>(&mut self, bus: &mut B, a: Operand, b: Operand, carry: Carry) {
        let use_carry = carry == Carry::With;
        match (a, b) {
            (Operand::Byte(dst), Operand::Byte(src)) => {
                let result = self.alu_add(dst.value(), src.value(), use_carry);
                self.write_operand(bus, &dst, result);
            }
            // ADD HL,rr
            (
                Operand::Word(WordOperand::Register { reg: Reg16::HL, value }),
                Operand::Word(src),
            ) => {
                let result = self.alu_add16_hl(value, src.value());
                self.regs.set_hl(result);
            }
            // ADD SP,r8
            (
                Operand::Word(WordOperand::Register { reg: Reg16::SP, value }),
                Operand::Relative(offset),
            ) => {
                self.regs.sp = self.alu_add16_signed(value, offset);
            }
            (a, b) => panic!("unsupported ADD operands: {a:?}, {b:?}"),
        }
    }

    pub(super) fn exec_sub(&mut self, x: ByteOperand, carry: Carry) {
        self.regs.a = self.alu_sub(self.regs.a, x.value(), carry == Carry::With);
    }

    pub(super) fn exec_cpl(&mut self) {
        self.regs.a = !self.regs.a;
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
    }

    pub(super) fn exec_carry_flag(&mut self, op: CarryFlagOp) {
        let carry = match op {
            CarryFlagOp::Set => true,
            CarryFlagOp::Complement => !self.flag(Flag::C),
        };
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, carry);
    }
}
