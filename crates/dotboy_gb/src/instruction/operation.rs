use std::fmt;

use super::{
    ByteOperand, Carry, CarryFlagOp, Condition, Definition, Direction, LoadMode, Operand,
    RotateMode, Shift, Vector, WordOperand, ZeroFlag,
};
use crate::cpu::Reg16;

/// A fully resolved instruction, ready to execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Nop,
    Halt,
    Stop,
    Invalid { address: u16, opcode: u8 },
    DecimalAdjust,
    Complement,
    CarryFlag(CarryFlagOp),
    Interrupts(bool),
    Add(Operand, Operand, Carry),
    Sub(ByteOperand, Carry),
    And(ByteOperand),
    Xor(ByteOperand),
    Or(ByteOperand),
    Compare(ByteOperand),
    IncByte(ByteOperand),
    DecByte(ByteOperand),
    IncWord(Reg16),
    DecWord(Reg16),
    Rotate(Direction, RotateMode, ZeroFlag, ByteOperand),
    Shift(Shift, ByteOperand),
    Swap(ByteOperand),
    TestBit(u8, ByteOperand),
    ResetBit(u8, ByteOperand),
    SetBit(u8, ByteOperand),
    Jump(Condition, Operand),
    Call(Condition, u16),
    Return(Condition),
    ReturnFromInterrupt,
    Restart(Vector),
    LoadByte(LoadMode, ByteOperand, ByteOperand),
    LoadWord(WordOperand, WordOperand),
    Push(Reg16),
    Pop(Reg16),
}

impl Operation {
    /// The addressing-mode shape this operation was decoded from.
    pub fn definition(&self) -> Definition {
        match *self {
            Operation::Nop => Definition::Nop,
            Operation::Halt => Definition::Halt,
            Operation::Stop => Definition::Stop,
            Operation::Invalid { .. } => Definition::Invalid,
            Operation::DecimalAdjust => Definition::DecimalAdjust,
            Operation::Complement => Definition::Complement,
            Operation::CarryFlag(op) => Definition::CarryFlag(op),
            Operation::Interrupts(enable) => Definition::Interrupts(enable),
            Operation::Add(a, b, carry) => Definition::Add(a.definition(), b.definition(), carry),
            Operation::Sub(x, carry) => Definition::Sub(x.definition(), carry),
            Operation::And(x) => Definition::And(x.definition()),
            Operation::Xor(x) => Definition::Xor(x.definition()),
            Operation::Or(x) => Definition::Or(x.definition()),
            Operation::Compare(x) => Definition::Compare(x.definition()),
            Operation::IncByte(x) => Definition::IncByte(x.definition()),
            Operation::DecByte(x) => Definition::DecByte(x.definition()),
            Operation::IncWord(reg) => Definition::IncWord(reg),
            Operation::DecWord(reg) => Definition::DecWord(reg),
            Operation::Rotate(dir, mode, zero, x) => {
                Definition::Rotate(dir, mode, zero, x.definition())
            }
            Operation::Shift(kind, x) => Definition::Shift(kind, x.definition()),
            Operation::Swap(x) => Definition::Swap(x.definition()),
            Operation::TestBit(n, x) => Definition::TestBit(n, x.definition()),
            Operation::ResetBit(n, x) => Definition::ResetBit(n, x.definition()),
            Operation::SetBit(n, x) => Definition::SetBit(n, x.definition()),
            Operation::Jump(cond, target) => Definition::Jump(cond, target.definition()),
            Operation::Call(cond, _) => Definition::Call(cond),
            Operation::Return(cond) => Definition::Return(cond),
            Operation::ReturnFromInterrupt => Definition::ReturnFromInterrupt,
            Operation::Restart(vector) => Definition::Restart(vector),
            Operation::LoadByte(mode, dst, src) => {
                Definition::LoadByte(mode, dst.definition(), src.definition())
            }
            Operation::LoadWord(dst, src) => Definition::LoadWord(dst.definition(), src.definition()),
            Operation::Push(reg) => Definition::Push(reg),
            Operation::Pop(reg) => Definition::Pop(reg),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::disassemble_operation(self))
    }
}
