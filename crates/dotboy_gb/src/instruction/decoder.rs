use super::{
    ByteOperand, ByteOperandDef, Definition, InstructionOrSet, InstructionSet, Operand,
    OperandDef, Operation, Timing, WordOperand, WordOperandDef, INSTRUCTIONS,
};
use crate::bits;
use crate::cpu::{Bus, Cpu};

/// Result of decoding the instruction at PC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub operation: Operation,
    /// Cost with the branch condition already evaluated.
    pub cycles: u32,
    /// Bytes consumed, including any 0xCB prefix.
    pub length: u16,
}

/// Reads the instruction at PC without touching CPU state.
///
/// Operands are fetched left to right; memory operands are read through the
/// CPU so timer and interrupt registers resolve to live values.
pub struct Decoder<'a, B: Bus> {
    cpu: &'a Cpu,
    bus: &'a mut B,
    pc: u16,
    offset: u16,
}

impl<'a, B: Bus> Decoder<'a, B> {
    pub fn new(cpu: &'a Cpu, bus: &'a mut B) -> Self {
        Self {
            cpu,
            pc: cpu.regs.pc,
            bus,
            offset: 0,
        }
    }

    pub fn decode(mut self) -> Decoded {
        self.decode_in(&INSTRUCTIONS)
    }

    fn decode_in(&mut self, set: &InstructionSet) -> Decoded {
        let address = self.pc.wrapping_add(self.offset);
        let opcode = self.next_byte();
        match set.get(opcode) {
            InstructionOrSet::Set(nested) => self.decode_in(nested),
            InstructionOrSet::Instruction(instruction) => {
                let operation = self.resolve(instruction.definition, address, opcode);
                let cycles = match instruction.timing {
                    Timing::Constant(cycles) => cycles,
                    Timing::Variable { taken, not_taken } => {
                        let taken_branch = instruction
                            .definition
                            .condition()
                            .is_some_and(|cond| cond.holds(&self.cpu.regs));
                        if taken_branch {
                            taken
                        } else {
                            not_taken
                        }
                    }
                };
                Decoded {
                    operation,
                    cycles,
                    length: self.offset,
                }
            }
        }
    }

    fn resolve(&mut self, definition: Definition, address: u16, opcode: u8) -> Operation {
        match definition {
            Definition::Nop => Operation::Nop,
            Definition::Halt => Operation::Halt,
            Definition::Stop => Operation::Stop,
            Definition::Invalid => Operation::Invalid { address, opcode },
            Definition::DecimalAdjust => Operation::DecimalAdjust,
            Definition::Complement => Operation::Complement,
            Definition::CarryFlag(op) => Operation::CarryFlag(op),
            Definition::Interrupts(enable) => Operation::Interrupts(enable),
            Definition::Add(a, b, carry) => {
                let a = self.operand(a);
                let b = self.operand(b);
                Operation::Add(a, b, carry)
            }
            Definition::Sub(x, carry) => Operation::Sub(self.byte(x), carry),
            Definition::And(x) => Operation::And(self.byte(x)),
            Definition::Xor(x) => Operation::Xor(self.byte(x)),
            Definition::Or(x) => Operation::Or(self.byte(x)),
            Definition::Compare(x) => Operation::Compare(self.byte(x)),
            Definition::IncByte(x) => Operation::IncByte(self.byte(x)),
            Definition::DecByte(x) => Operation::DecByte(self.byte(x)),
            Definition::IncWord(reg) => Operation::IncWord(reg),
            Definition::DecWord(reg) => Operation::DecWord(reg),
            Definition::Rotate(dir, mode, zero, x) => Operation::Rotate(dir, mode, zero, self.byte(x)),
            Definition::Shift(kind, x) => Operation::Shift(kind, self.byte(x)),
            Definition::Swap(x) => Operation::Swap(self.byte(x)),
            Definition::TestBit(n, x) => Operation::TestBit(n, self.byte(x)),
            Definition::ResetBit(n, x) => Operation::ResetBit(n, self.byte(x)),
            Definition::SetBit(n, x) => Operation::SetBit(n, self.byte(x)),
            Definition::Jump(cond, target) => Operation::Jump(cond, self.operand(target)),
            Definition::Call(cond) => Operation::Call(cond, self.next_word()),
            Definition::Return(cond) => Operation::Return(cond),
            Definition::ReturnFromInterrupt => Operation::ReturnFromInterrupt,
            Definition::Restart(vector) => Operation::Restart(vector),
            Definition::LoadByte(mode, dst, src) => {
                let dst = self.byte(dst);
                let src = self.byte(src);
                Operation::LoadByte(mode, dst, src)
            }
            Definition::LoadWord(dst, src) => {
                let dst = self.word(dst);
                let src = self.word(src);
                Operation::LoadWord(dst, src)
            }
            Definition::Push(reg) => Operation::Push(reg),
            Definition::Pop(reg) => Operation::Pop(reg),
        }
    }

    fn operand(&mut self, def: OperandDef) -> Operand {
        match def {
            OperandDef::Byte(def) => Operand::Byte(self.byte(def)),
            OperandDef::Word(def) => Operand::Word(self.word(def)),
            OperandDef::Relative => Operand::Relative(self.next_byte() as i8),
        }
    }

    fn byte(&mut self, def: ByteOperandDef) -> ByteOperand {
        let cpu = self.cpu;
        let regs = &cpu.regs;
        match def {
            ByteOperandDef::Immediate => ByteOperand::Immediate(self.next_byte()),
            ByteOperandDef::Register(reg) => ByteOperand::Register {
                reg,
                value: regs.get8(reg),
            },
            ByteOperandDef::Indirect(reg) => {
                let address = regs.get16(reg);
                ByteOperand::Indirect {
                    reg,
                    address,
                    value: self.read(address),
                }
            }
            ByteOperandDef::HighIndirect(reg) => {
                let address = bits::word(0xFF, regs.get8(reg));
                ByteOperand::HighIndirect {
                    reg,
                    address,
                    value: self.read(address),
                }
            }
            ByteOperandDef::Address => {
                let address = self.next_word();
                ByteOperand::Address {
                    address,
                    value: self.read(address),
                }
            }
            ByteOperandDef::HighAddress => {
                let address = bits::word(0xFF, self.next_byte());
                ByteOperand::HighAddress {
                    address,
                    value: self.read(address),
                }
            }
        }
    }

    fn word(&mut self, def: WordOperandDef) -> WordOperand {
        match def {
            WordOperandDef::Immediate => WordOperand::Immediate(self.next_word()),
            WordOperandDef::Register(reg) => WordOperand::Register {
                reg,
                value: self.cpu.regs.get16(reg),
            },
            WordOperandDef::Indexed(reg) => WordOperand::Indexed {
                reg,
                base: self.cpu.regs.get16(reg),
                offset: self.next_byte() as i8,
            },
            WordOperandDef::Address => {
                let address = self.next_word();
                let low = self.read(address);
                let high = self.read(address.wrapping_add(1));
                WordOperand::Address {
                    address,
                    value: bits::word(high, low),
                }
            }
        }
    }

    #[inline]
    fn read(&mut self, address: u16) -> u8 {
        self.cpu.read8(self.bus, address)
    }

    fn next_byte(&mut self) -> u8 {
        let value = self.read(self.pc.wrapping_add(self.offset));
        self.offset += 1;
        value
    }

    fn next_word(&mut self) -> u16 {
        let low = self.next_byte();
        let high = self.next_byte();
        bits::word(high, low)
    }
}
