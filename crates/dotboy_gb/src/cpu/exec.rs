mod alu;
mod control;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu};
use crate::instruction::{ByteOperand, Operation};

impl Cpu {
    /// Execute a decoded operation. PC already points past it.
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B, operation: &Operation) {
        match *operation {
            Operation::Nop => {}
            Operation::Halt => self.exec_halt(),
            Operation::Stop => self.exec_stop(),
            Operation::Invalid { address, opcode } => self.exec_invalid(address, opcode),
            Operation::Interrupts(enable) => self.exec_interrupts(enable),

            // Accumulator and flag ops
            Operation::DecimalAdjust => self.regs.a = self.alu_daa(self.regs.a),
            Operation::Complement => self.exec_cpl(),
            Operation::CarryFlag(op) => self.exec_carry_flag(op),

            // 8/16-bit arithmetic
            Operation::Add(a, b, carry) => self.exec_add(bus, a, b, carry),
            Operation::Sub(x, carry) => self.exec_sub(x, carry),
            Operation::And(x) => self.regs.a = self.alu_and(self.regs.a, x.value()),
            Operation::Xor(x) => self.regs.a = self.alu_xor(self.regs.a, x.value()),
            Operation::Or(x) => self.regs.a = self.alu_or(self.regs.a, x.value()),
            Operation::Compare(x) => {
                self.alu_sub(self.regs.a, x.value(), false);
            }
            Operation::IncByte(x) => {
                let result = self.alu_inc8(x.value());
                self.write_operand(bus, &x, result);
            }
            Operation::DecByte(x) => {
                let result = self.alu_dec8(x.value());
                self.write_operand(bus, &x, result);
            }
            Operation::IncWord(reg) => {
                let value = self.regs.get16(reg).wrapping_add(1);
                self.regs.set16(reg, value);
            }
            Operation::DecWord(reg) => {
                let value = self.regs.get16(reg).wrapping_sub(1);
                self.regs.set16(reg, value);
            }

            // Rotates, shifts and bit ops
            Operation::Rotate(direction, mode, zero, x) => {
                let result = self.alu_rotate(x.value(), direction, mode, zero);
                self.write_operand(bus, &x, result);
            }
            Operation::Shift(kind, x) => {
                let result = self.alu_shift(x.value(), kind);
                self.write_operand(bus, &x, result);
            }
            Operation::Swap(x) => {
                let result = self.alu_swap(x.value());
                self.write_operand(bus, &x, result);
            }
            Operation::TestBit(n, x) => self.alu_bit(x.value(), n),
            Operation::ResetBit(n, x) => {
                let result = crate::bits::with_bit(x.value(), n, false);
                self.write_operand(bus, &x, result);
            }
            Operation::SetBit(n, x) => {
                let result = crate::bits::with_bit(x.value(), n, true);
                self.write_operand(bus, &x, result);
            }

            // Control flow
            Operation::Jump(cond, target) => self.exec_jump(cond, target),
            Operation::Call(cond, address) => self.exec_call(bus, cond, address),
            Operation::Return(cond) => self.exec_return(bus, cond),
            Operation::ReturnFromInterrupt => self.exec_reti(bus),
            Operation::Restart(vector) => self.restart(bus, vector),

            // Loads and stack
            Operation::LoadByte(mode, dst, src) => self.exec_load_byte(bus, mode, dst, src),
            Operation::LoadWord(dst, src) => self.exec_load_word(bus, dst, src),
            Operation::Push(reg) => self.exec_push(bus, reg),
            Operation::Pop(reg) => self.exec_pop(bus, reg),
        }
    }

    /// Store `value` back into a register or memory operand.
    fn write_operand<B: Bus>(&mut self, bus: &mut B, operand: &ByteOperand, value: u8) {
        match *operand {
            ByteOperand::Register { reg, .. } => self.regs.set8(reg, value),
            ByteOperand::Indirect { address, .. }
            | ByteOperand::HighIndirect { address, .. }
            | ByteOperand::Address { address, .. }
            | ByteOperand::HighAddress { address, .. } => self.write8(bus, address, value),
            ByteOperand::Immediate(_) => {
                panic!("cannot write to an immediate operand: {operand:?}")
            }
        }
    }
}
