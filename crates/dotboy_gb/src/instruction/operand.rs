use crate::bits;
use crate::cpu::{Reg16, Reg8};

/// Where an 8-bit operand comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOperandDef {
    /// `d8`, the byte after the opcode.
    Immediate,
    Register(Reg8),
    /// Memory at the address held in a register pair, e.g. `(HL)`.
    Indirect(Reg16),
    /// Memory at `0xFF00 + reg`, e.g. `(C)`.
    HighIndirect(Reg8),
    /// Memory at an immediate word address, `(a16)`.
    Address,
    /// Memory at `0xFF00 + d8`, `(a8)`.
    HighAddress,
}

/// Where a 16-bit operand comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordOperandDef {
    Immediate,
    Register(Reg16),
    /// Register plus a signed immediate byte, `SP+r8`.
    Indexed(Reg16),
    Address,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandDef {
    Byte(ByteOperandDef),
    Word(WordOperandDef),
    /// Signed byte displacement, `r8`.
    Relative,
}

impl ByteOperandDef {
    /// Bytes consumed after the opcode.
    pub const fn size(self) -> u16 {
        match self {
            ByteOperandDef::Immediate | ByteOperandDef::HighAddress => 1,
            ByteOperandDef::Address => 2,
            ByteOperandDef::Register(_)
            | ByteOperandDef::Indirect(_)
            | ByteOperandDef::HighIndirect(_) => 0,
        }
    }
}

impl WordOperandDef {
    pub const fn size(self) -> u16 {
        match self {
            WordOperandDef::Immediate | WordOperandDef::Address => 2,
            WordOperandDef::Indexed(_) => 1,
            WordOperandDef::Register(_) => 0,
        }
    }
}

impl OperandDef {
    pub const fn size(self) -> u16 {
        match self {
            OperandDef::Byte(def) => def.size(),
            OperandDef::Word(def) => def.size(),
            OperandDef::Relative => 1,
        }
    }
}

/// A byte operand resolved at decode time.
///
/// Memory operands keep both the effective address (for write-back) and
/// the value read while decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOperand {
    Immediate(u8),
    Register { reg: Reg8, value: u8 },
    Indirect { reg: Reg16, address: u16, value: u8 },
    HighIndirect { reg: Reg8, address: u16, value: u8 },
    Address { address: u16, value: u8 },
    HighAddress { address: u16, value: u8 },
}

impl ByteOperand {
    pub fn value(&self) -> u8 {
        match *self {
            ByteOperand::Immediate(value)
            | ByteOperand::Register { value, .. }
            | ByteOperand::Indirect { value, .. }
            | ByteOperand::HighIndirect { value, .. }
            | ByteOperand::Address { value, .. }
            | ByteOperand::HighAddress { value, .. } => value,
        }
    }

    /// Effective memory address, `None` for immediates and registers.
    pub fn address(&self) -> Option<u16> {
        match *self {
            ByteOperand::Indirect { address, .. }
            | ByteOperand::HighIndirect { address, .. }
            | ByteOperand::Address { address, .. }
            | ByteOperand::HighAddress { address, .. } => Some(address),
            ByteOperand::Immediate(_) | ByteOperand::Register { .. } => None,
        }
    }

    pub fn definition(&self) -> ByteOperandDef {
        match *self {
            ByteOperand::Immediate(_) => ByteOperandDef::Immediate,
            ByteOperand::Register { reg, .. } => ByteOperandDef::Register(reg),
            ByteOperand::Indirect { reg, .. } => ByteOperandDef::Indirect(reg),
            ByteOperand::HighIndirect { reg, .. } => ByteOperandDef::HighIndirect(reg),
            ByteOperand::Address { .. } => ByteOperandDef::Address,
            ByteOperand::HighAddress { .. } => ByteOperandDef::HighAddress,
        }
    }
}

/// A word operand resolved at decode time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordOperand {
    Immediate(u16),
    Register { reg: Reg16, value: u16 },
    Indexed { reg: Reg16, base: u16, offset: i8 },
    Address { address: u16, value: u16 },
}

impl WordOperand {
    pub fn value(&self) -> u16 {
        match *self {
            WordOperand::Immediate(value)
            | WordOperand::Register { value, .. }
            | WordOperand::Address { value, .. } => value,
            WordOperand::Indexed { base, offset, .. } => bits::offset(base, offset),
        }
    }

    pub fn definition(&self) -> WordOperandDef {
        match *self {
            WordOperand::Immediate(_) => WordOperandDef::Immediate,
            WordOperand::Register { reg, .. } => WordOperandDef::Register(reg),
            WordOperand::Indexed { reg, .. } => WordOperandDef::Indexed(reg),
            WordOperand::Address { .. } => WordOperandDef::Address,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Byte(ByteOperand),
    Word(WordOperand),
    Relative(i8),
}

impl Operand {
    pub fn definition(&self) -> OperandDef {
        match self {
            Operand::Byte(operand) => OperandDef::Byte(operand.definition()),
            Operand::Word(operand) => OperandDef::Word(operand.definition()),
            Operand::Relative(_) => OperandDef::Relative,
        }
    }
}
