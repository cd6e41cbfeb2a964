//! Opcode table, operand model and decoder.
//!
//! Definitions describe addressing modes only; the decoder resolves them
//! against live register and memory state into an [`Operation`] that the CPU
//! executes.

use std::borrow::Cow;

use lazy_static::lazy_static;

use crate::cpu::{Flag, Reg16, Registers};

mod decoder;
mod disassembler;
mod operand;
mod operation;
mod table;

pub use decoder::{Decoded, Decoder};
pub use disassembler::{disassemble_definition, disassemble_operation};
pub use operand::{ByteOperand, ByteOperandDef, Operand, OperandDef, WordOperand, WordOperandDef};
pub use operation::Operation;

lazy_static! {
    /// The full primary table, with the CB-prefixed set nested under 0xCB.
    pub static ref INSTRUCTIONS: InstructionSet = table::build();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Always,
    Carry,
    NotCarry,
    Zero,
    NotZero,
}

impl Condition {
    pub fn holds(self, regs: &Registers) -> bool {
        match self {
            Condition::Always => true,
            Condition::Carry => regs.flag(Flag::C),
            Condition::NotCarry => !regs.flag(Flag::C),
            Condition::Zero => regs.flag(Flag::Z),
            Condition::NotZero => !regs.flag(Flag::Z),
        }
    }
}

/// Whether ADD/SUB fold the carry flag in (ADC/SBC).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Carry {
    Without,
    With,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotateMode {
    /// RLC/RRC: the bit shifted out re-enters at the opposite end.
    Circular,
    /// RL/RR: the previous carry flag re-enters.
    ThroughCarry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZeroFlag {
    /// RLCA/RRCA/RLA/RRA always clear Z.
    Clear,
    FromResult,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shift {
    /// SLA
    LeftArithmetic,
    /// SRA, bit 7 is preserved.
    RightArithmetic,
    /// SRL
    RightLogical,
}

/// Post-access adjustment of the pointer register for `LD (HL+)` style loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadMode {
    Normal,
    Increment(Reg16),
    Decrement(Reg16),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarryFlagOp {
    Set,
    Complement,
}

/// Fixed jump targets for RST and interrupt dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vector {
    Rst00 = 0x00,
    Rst08 = 0x08,
    Rst10 = 0x10,
    Rst18 = 0x18,
    Rst20 = 0x20,
    Rst28 = 0x28,
    Rst30 = 0x30,
    Rst38 = 0x38,
    VBlank = 0x40,
    LcdStat = 0x48,
    Timer = 0x50,
    Serial = 0x58,
    Joypad = 0x60,
}

impl Vector {
    #[inline]
    pub const fn address(self) -> u16 {
        self as u16
    }
}

/// Addressing-mode description of one opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Definition {
    Nop,
    Halt,
    Stop,
    Invalid,
    DecimalAdjust,
    Complement,
    CarryFlag(CarryFlagOp),
    /// EI (`true`) or DI (`false`).
    Interrupts(bool),
    Add(OperandDef, OperandDef, Carry),
    Sub(ByteOperandDef, Carry),
    And(ByteOperandDef),
    Xor(ByteOperandDef),
    Or(ByteOperandDef),
    Compare(ByteOperandDef),
    IncByte(ByteOperandDef),
    DecByte(ByteOperandDef),
    IncWord(Reg16),
    DecWord(Reg16),
    Rotate(Direction, RotateMode, ZeroFlag, ByteOperandDef),
    Shift(Shift, ByteOperandDef),
    Swap(ByteOperandDef),
    TestBit(u8, ByteOperandDef),
    ResetBit(u8, ByteOperandDef),
    SetBit(u8, ByteOperandDef),
    Jump(Condition, OperandDef),
    /// Target is always an immediate word.
    Call(Condition),
    Return(Condition),
    ReturnFromInterrupt,
    Restart(Vector),
    LoadByte(LoadMode, ByteOperandDef, ByteOperandDef),
    LoadWord(WordOperandDef, WordOperandDef),
    Push(Reg16),
    Pop(Reg16),
}

impl Definition {
    /// Branch condition for JP/JR/CALL/RET, if any.
    pub fn condition(&self) -> Option<Condition> {
        match *self {
            Definition::Jump(cond, _) | Definition::Call(cond) | Definition::Return(cond) => {
                Some(cond)
            }
            _ => None,
        }
    }
}

/// Cost in clock cycles (NOP = 4).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timing {
    Constant(u32),
    Variable { taken: u32, not_taken: u32 },
}

#[derive(Clone, Debug)]
pub struct Instruction {
    pub definition: Definition,
    pub mnemonic: Cow<'static, str>,
    pub timing: Timing,
}

#[derive(Clone, Debug)]
pub enum InstructionOrSet {
    Instruction(Instruction),
    Set(InstructionSet),
}

/// Exactly 256 entries, indexed by opcode.
#[derive(Clone, Debug)]
pub struct InstructionSet {
    entries: Box<[InstructionOrSet]>,
}

impl InstructionSet {
    /// Build a set from a slot per opcode. Panics if any slot is empty.
    pub fn new(entries: Vec<Option<InstructionOrSet>>) -> Self {
        assert_eq!(entries.len(), 256, "instruction set must have 256 slots");
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(opcode, entry)| match entry {
                Some(entry) => entry,
                None => panic!("incomplete instruction set: missing opcode {opcode:02X}"),
            })
            .collect();
        let set = Self { entries };
        set.assert_complete();
        set
    }

    #[inline]
    pub fn get(&self, opcode: u8) -> &InstructionOrSet {
        &self.entries[opcode as usize]
    }

    /// Every primary and nested opcode resolves to an entry.
    pub fn assert_complete(&self) {
        assert_eq!(self.entries.len(), 256);
        for entry in self.entries.iter() {
            if let InstructionOrSet::Set(nested) = entry {
                nested.assert_complete();
            }
        }
    }

    /// Iterate `(opcode, entry)` pairs in opcode order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &InstructionOrSet)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(opcode, entry)| (opcode as u8, entry))
    }
}

#[cfg(test)]
mod tests;
