//! Text rendering for definitions (`LD B,d8`) and decoded operations
//! (`LD B,$12`).
//!
//! Operations reuse the definition template and substitute its placeholders
//! left to right with decoded values.

use super::{
    ByteOperand, ByteOperandDef, Carry, CarryFlagOp, Condition, Definition, Direction, LoadMode,
    Operand, OperandDef, Operation, RotateMode, Shift, WordOperand, WordOperandDef, ZeroFlag,
};
use crate::cpu::Reg8;

// `+r8` swallows the sign so `SP+r8` renders as `SP-3`.
const PLACEHOLDERS: [&str; 6] = ["d16", "a16", "d8", "a8", "+r8", "r8"];

pub fn disassemble_definition(definition: &Definition) -> String {
    match *definition {
        Definition::Nop => "NOP".into(),
        Definition::Halt => "HALT".into(),
        Definition::Stop => "STOP".into(),
        Definition::Invalid => "ILLEGAL".into(),
        Definition::DecimalAdjust => "DAA".into(),
        Definition::Complement => "CPL".into(),
        Definition::CarryFlag(CarryFlagOp::Set) => "SCF".into(),
        Definition::CarryFlag(CarryFlagOp::Complement) => "CCF".into(),
        Definition::Interrupts(true) => "EI".into(),
        Definition::Interrupts(false) => "DI".into(),
        Definition::Add(a, b, carry) => {
            let name = match carry {
                Carry::Without => "ADD",
                Carry::With => "ADC",
            };
            format!("{name} {},{}", operand(a), operand(b))
        }
        Definition::Sub(x, Carry::Without) => format!("SUB {}", byte(x, LoadMode::Normal)),
        Definition::Sub(x, Carry::With) => format!("SBC A,{}", byte(x, LoadMode::Normal)),
        Definition::And(x) => format!("AND {}", byte(x, LoadMode::Normal)),
        Definition::Xor(x) => format!("XOR {}", byte(x, LoadMode::Normal)),
        Definition::Or(x) => format!("OR {}", byte(x, LoadMode::Normal)),
        Definition::Compare(x) => format!("CP {}", byte(x, LoadMode::Normal)),
        Definition::IncByte(x) => format!("INC {}", byte(x, LoadMode::Normal)),
        Definition::DecByte(x) => format!("DEC {}", byte(x, LoadMode::Normal)),
        Definition::IncWord(reg) => format!("INC {reg}"),
        Definition::DecWord(reg) => format!("DEC {reg}"),
        Definition::Rotate(dir, mode, ZeroFlag::Clear, ByteOperandDef::Register(Reg8::A)) => {
            format!("{}A", rotate_name(dir, mode))
        }
        Definition::Rotate(dir, mode, _, x) => {
            format!("{} {}", rotate_name(dir, mode), byte(x, LoadMode::Normal))
        }
        Definition::Shift(kind, x) => {
            let name = match kind {
                Shift::LeftArithmetic => "SLA",
                Shift::RightArithmetic => "SRA",
                Shift::RightLogical => "SRL",
            };
            format!("{name} {}", byte(x, LoadMode::Normal))
        }
        Definition::Swap(x) => format!("SWAP {}", byte(x, LoadMode::Normal)),
        Definition::TestBit(n, x) => format!("BIT {n},{}", byte(x, LoadMode::Normal)),
        Definition::ResetBit(n, x) => format!("RES {n},{}", byte(x, LoadMode::Normal)),
        Definition::SetBit(n, x) => format!("SET {n},{}", byte(x, LoadMode::Normal)),
        Definition::Jump(cond, OperandDef::Relative) => conditional("JR", cond, "r8"),
        Definition::Jump(cond, OperandDef::Word(WordOperandDef::Immediate)) => {
            conditional("JP", cond, "a16")
        }
        Definition::Jump(cond, target) => conditional("JP", cond, &operand(target)),
        Definition::Call(cond) => conditional("CALL", cond, "a16"),
        Definition::Return(Condition::Always) => "RET".into(),
        Definition::Return(cond) => format!("RET {}", condition(cond)),
        Definition::ReturnFromInterrupt => "RETI".into(),
        Definition::Restart(vector) => format!("RST {:02X}H", vector.address()),
        Definition::LoadByte(mode, dst, src) => {
            let high = matches!(dst, ByteOperandDef::HighAddress)
                || matches!(src, ByteOperandDef::HighAddress);
            let name = if high { "LDH" } else { "LD" };
            format!("{name} {},{}", byte(dst, mode), byte(src, mode))
        }
        Definition::LoadWord(dst, src) => format!("LD {},{}", word(dst), word(src)),
        Definition::Push(reg) => format!("PUSH {reg}"),
        Definition::Pop(reg) => format!("POP {reg}"),
    }
}

/// Render a decoded operation with its immediate values filled in.
pub fn disassemble_operation(operation: &Operation) -> String {
    let template = disassemble_definition(&operation.definition());
    if let Operation::Invalid { opcode, .. } = *operation {
        return format!("{template} ${opcode:02X}");
    }
    let mut values = immediates(operation).into_iter();
    let mut out = String::with_capacity(template.len() + 4);
    let mut rest = template.as_str();
    while let Some((at, token)) = next_placeholder(rest) {
        let Some(value) = values.next() else {
            break;
        };
        out.push_str(&rest[..at]);
        out.push_str(&value);
        rest = &rest[at + token.len()..];
    }
    out.push_str(rest);
    out
}

fn next_placeholder(text: &str) -> Option<(usize, &'static str)> {
    PLACEHOLDERS
        .iter()
        .filter_map(|token| text.find(token).map(|at| (at, *token)))
        .min_by_key(|(at, token)| (*at, usize::MAX - token.len()))
}

/// Decoded immediate values in operand order, formatted for display.
fn immediates(operation: &Operation) -> Vec<String> {
    let mut values = Vec::new();
    match operation {
        Operation::Add(a, b, _) => {
            push_operand(a, &mut values);
            push_operand(b, &mut values);
        }
        Operation::Sub(x, _)
        | Operation::And(x)
        | Operation::Xor(x)
        | Operation::Or(x)
        | Operation::Compare(x) => push_byte(x, &mut values),
        Operation::Jump(_, target) => push_operand(target, &mut values),
        Operation::Call(_, address) => values.push(format!("${address:04X}")),
        Operation::LoadByte(_, dst, src) => {
            push_byte(dst, &mut values);
            push_byte(src, &mut values);
        }
        Operation::LoadWord(dst, src) => {
            push_word(dst, &mut values);
            push_word(src, &mut values);
        }
        _ => {}
    }
    values
}

fn push_operand(x: &Operand, values: &mut Vec<String>) {
    match x {
        Operand::Byte(x) => push_byte(x, values),
        Operand::Word(x) => push_word(x, values),
        Operand::Relative(offset) => values.push(format!("{offset:+}")),
    }
}

fn push_byte(x: &ByteOperand, values: &mut Vec<String>) {
    match *x {
        ByteOperand::Immediate(value) => values.push(format!("${value:02X}")),
        ByteOperand::Address { address, .. } | ByteOperand::HighAddress { address, .. } => {
            values.push(format!("${address:04X}"))
        }
        _ => {}
    }
}

fn push_word(x: &WordOperand, values: &mut Vec<String>) {
    match *x {
        WordOperand::Immediate(value) | WordOperand::Address { address: value, .. } => {
            values.push(format!("${value:04X}"))
        }
        WordOperand::Indexed { offset, .. } => values.push(format!("{offset:+}")),
        WordOperand::Register { .. } => {}
    }
}

fn rotate_name(dir: Direction, mode: RotateMode) -> &'static str {
    match (dir, mode) {
        (Direction::Left, RotateMode::Circular) => "RLC",
        (Direction::Left, RotateMode::ThroughCarry) => "RL",
        (Direction::Right, RotateMode::Circular) => "RRC",
        (Direction::Right, RotateMode::ThroughCarry) => "RR",
    }
}

fn condition(cond: Condition) -> &'static str {
    match cond {
        Condition::Always => "",
        Condition::Carry => "C",
        Condition::NotCarry => "NC",
        Condition::Zero => "Z",
        Condition::NotZero => "NZ",
    }
}

fn conditional(name: &str, cond: Condition, target: &str) -> String {
    match cond {
        Condition::Always => format!("{name} {target}"),
        cond => format!("{name} {},{target}", condition(cond)),
    }
}

fn operand(def: OperandDef) -> String {
    match def {
        OperandDef::Byte(def) => byte(def, LoadMode::Normal),
        OperandDef::Word(def) => word(def),
        OperandDef::Relative => "r8".into(),
    }
}

fn byte(def: ByteOperandDef, mode: LoadMode) -> String {
    match def {
        ByteOperandDef::Immediate => "d8".into(),
        ByteOperandDef::Register(reg) => reg.to_string(),
        ByteOperandDef::Indirect(reg) => match mode {
            LoadMode::Increment(target) if target == reg => format!("({reg}+)"),
            LoadMode::Decrement(target) if target == reg => format!("({reg}-)"),
            _ => format!("({reg})"),
        },
        ByteOperandDef::HighIndirect(reg) => format!("({reg})"),
        ByteOperandDef::Address => "(a16)".into(),
        ByteOperandDef::HighAddress => "(a8)".into(),
    }
}

fn word(def: WordOperandDef) -> String {
    match def {
        WordOperandDef::Immediate => "d16".into(),
        WordOperandDef::Register(reg) => reg.to_string(),
        WordOperandDef::Indexed(reg) => format!("{reg}+r8"),
        WordOperandDef::Address => "(a16)".into(),
    }
}
