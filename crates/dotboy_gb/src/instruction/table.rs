use std::borrow::Cow;

use super::{
    ByteOperandDef, Carry, CarryFlagOp, Condition, Definition as Def, Direction, InstructionOrSet,
    InstructionSet, Instruction, LoadMode, OperandDef, RotateMode, Shift, Timing, Vector,
    WordOperandDef, ZeroFlag,
};
use crate::cpu::{Reg16, Reg8};

const A: ByteOperandDef = ByteOperandDef::Register(Reg8::A);
const C: ByteOperandDef = ByteOperandDef::Register(Reg8::C);
const HL_PTR: ByteOperandDef = ByteOperandDef::Indirect(Reg16::HL);
const D8: ByteOperandDef = ByteOperandDef::Immediate;

/// Operand selected by the low three bits of LD/ALU/CB opcodes.
const R8: [(ByteOperandDef, &str); 8] = [
    (ByteOperandDef::Register(Reg8::B), "B"),
    (C, "C"),
    (ByteOperandDef::Register(Reg8::D), "D"),
    (ByteOperandDef::Register(Reg8::E), "E"),
    (ByteOperandDef::Register(Reg8::H), "H"),
    (ByteOperandDef::Register(Reg8::L), "L"),
    (HL_PTR, "(HL)"),
    (A, "A"),
];

/// Pair selected by bits 4-5 of 16-bit load/arith opcodes.
const R16: [(Reg16, &str); 4] = [
    (Reg16::BC, "BC"),
    (Reg16::DE, "DE"),
    (Reg16::HL, "HL"),
    (Reg16::SP, "SP"),
];

/// PUSH/POP use AF in place of SP.
const R16_STACK: [(Reg16, &str); 4] = [
    (Reg16::BC, "BC"),
    (Reg16::DE, "DE"),
    (Reg16::HL, "HL"),
    (Reg16::AF, "AF"),
];

/// Condition selected by bits 3-4 of branch opcodes.
const CONDITIONS: [(Condition, &str); 4] = [
    (Condition::NotZero, "NZ"),
    (Condition::Zero, "Z"),
    (Condition::NotCarry, "NC"),
    (Condition::Carry, "C"),
];

const RESTARTS: [Vector; 8] = [
    Vector::Rst00,
    Vector::Rst08,
    Vector::Rst10,
    Vector::Rst18,
    Vector::Rst20,
    Vector::Rst28,
    Vector::Rst30,
    Vector::Rst38,
];

const INVALID: [u8; 11] = [
    0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
];

struct SetBuilder {
    entries: Vec<Option<InstructionOrSet>>,
}

impl SetBuilder {
    fn new() -> Self {
        Self {
            entries: (0..256).map(|_| None).collect(),
        }
    }

    fn insert(&mut self, opcode: u8, entry: InstructionOrSet) {
        let slot = &mut self.entries[opcode as usize];
        assert!(slot.is_none(), "duplicate instruction for opcode {opcode:02X}");
        *slot = Some(entry);
    }

    fn timed(
        &mut self,
        opcode: u8,
        mnemonic: impl Into<Cow<'static, str>>,
        definition: Def,
        timing: Timing,
    ) {
        self.insert(
            opcode,
            InstructionOrSet::Instruction(Instruction {
                definition,
                mnemonic: mnemonic.into(),
                timing,
            }),
        );
    }

    fn op(&mut self, opcode: u8, mnemonic: impl Into<Cow<'static, str>>, definition: Def, cycles: u32) {
        self.timed(opcode, mnemonic, definition, Timing::Constant(cycles));
    }

    fn branch(
        &mut self,
        opcode: u8,
        mnemonic: impl Into<Cow<'static, str>>,
        definition: Def,
        taken: u32,
        not_taken: u32,
    ) {
        self.timed(opcode, mnemonic, definition, Timing::Variable { taken, not_taken });
    }

    fn build(self) -> InstructionSet {
        InstructionSet::new(self.entries)
    }
}

pub(super) fn build() -> InstructionSet {
    let mut set = SetBuilder::new();
    misc_block(&mut set);
    load_block(&mut set);
    alu_block(&mut set);
    control_block(&mut set);
    set.insert(0xCB, InstructionOrSet::Set(extended()));
    set.build()
}

/// 0x00-0x3F
fn misc_block(set: &mut SetBuilder) {
    let bc = ByteOperandDef::Indirect(Reg16::BC);
    let de = ByteOperandDef::Indirect(Reg16::DE);
    let normal = LoadMode::Normal;
    let inc = LoadMode::Increment(Reg16::HL);
    let dec = LoadMode::Decrement(Reg16::HL);
    let hl = OperandDef::Word(WordOperandDef::Register(Reg16::HL));

    set.op(0x00, "NOP", Def::Nop, 4);
    set.op(0x10, "STOP", Def::Stop, 4);
    set.op(0x27, "DAA", Def::DecimalAdjust, 4);
    set.op(0x2F, "CPL", Def::Complement, 4);
    set.op(0x37, "SCF", Def::CarryFlag(CarryFlagOp::Set), 4);
    set.op(0x3F, "CCF", Def::CarryFlag(CarryFlagOp::Complement), 4);

    set.op(0x02, "LD (BC),A", Def::LoadByte(normal, bc, A), 8);
    set.op(0x12, "LD (DE),A", Def::LoadByte(normal, de, A), 8);
    set.op(0x22, "LD (HL+),A", Def::LoadByte(inc, HL_PTR, A), 8);
    set.op(0x32, "LD (HL-),A", Def::LoadByte(dec, HL_PTR, A), 8);
    set.op(0x0A, "LD A,(BC)", Def::LoadByte(normal, A, bc), 8);
    set.op(0x1A, "LD A,(DE)", Def::LoadByte(normal, A, de), 8);
    set.op(0x2A, "LD A,(HL+)", Def::LoadByte(inc, A, HL_PTR), 8);
    set.op(0x3A, "LD A,(HL-)", Def::LoadByte(dec, A, HL_PTR), 8);
    set.op(
        0x08,
        "LD (a16),SP",
        Def::LoadWord(WordOperandDef::Address, WordOperandDef::Register(Reg16::SP)),
        20,
    );

    let accumulator_rotates = [
        (0x07, "RLCA", Direction::Left, RotateMode::Circular),
        (0x0F, "RRCA", Direction::Right, RotateMode::Circular),
        (0x17, "RLA", Direction::Left, RotateMode::ThroughCarry),
        (0x1F, "RRA", Direction::Right, RotateMode::ThroughCarry),
    ];
    for (opcode, mnemonic, dir, mode) in accumulator_rotates {
        set.op(opcode, mnemonic, Def::Rotate(dir, mode, ZeroFlag::Clear, A), 4);
    }

    set.op(0x18, "JR r8", Def::Jump(Condition::Always, OperandDef::Relative), 12);
    for (i, (cond, name)) in CONDITIONS.into_iter().enumerate() {
        let opcode = 0x20 | (i as u8) << 3;
        let mnemonic = format!("JR {name},r8");
        set.branch(opcode, mnemonic, Def::Jump(cond, OperandDef::Relative), 12, 8);
    }

    for (i, (pair, name)) in R16.into_iter().enumerate() {
        let row = (i as u8) << 4;
        let load = Def::LoadWord(WordOperandDef::Register(pair), WordOperandDef::Immediate);
        let add = Def::Add(hl, OperandDef::Word(WordOperandDef::Register(pair)), Carry::Without);
        set.op(row | 0x01, format!("LD {name},d16"), load, 12);
        set.op(row | 0x03, format!("INC {name}"), Def::IncWord(pair), 8);
        set.op(row | 0x09, format!("ADD HL,{name}"), add, 8);
        set.op(row | 0x0B, format!("DEC {name}"), Def::DecWord(pair), 8);
    }

    for (i, (target, name)) in R8.into_iter().enumerate() {
        let column = (i as u8) << 3;
        let memory = target == HL_PTR;
        let rmw = if memory { 12 } else { 4 };
        let load = if memory { 12 } else { 8 };
        set.op(column | 0x04, format!("INC {name}"), Def::IncByte(target), rmw);
        set.op(column | 0x05, format!("DEC {name}"), Def::DecByte(target), rmw);
        set.op(column | 0x06, format!("LD {name},d8"), Def::LoadByte(normal, target, D8), load);
    }
}

/// 0x40-0x7F: register-to-register loads, with HALT in place of LD (HL),(HL).
fn load_block(set: &mut SetBuilder) {
    for opcode in 0x40..=0x7Fu8 {
        if opcode == 0x76 {
            set.op(opcode, "HALT", Def::Halt, 4);
            continue;
        }
        let (dst, dst_name) = R8[((opcode >> 3) & 7) as usize];
        let (src, src_name) = R8[(opcode & 7) as usize];
        let cycles = if dst == HL_PTR || src == HL_PTR { 8 } else { 4 };
        set.op(
            opcode,
            format!("LD {dst_name},{src_name}"),
            Def::LoadByte(LoadMode::Normal, dst, src),
            cycles,
        );
    }
}

/// The eight accumulator operations, selected by bits 3-5.
fn alu(index: u8, operand: ByteOperandDef, name: &str) -> (String, Def) {
    let a = OperandDef::Byte(A);
    let x = OperandDef::Byte(operand);
    match index {
        0 => (format!("ADD A,{name}"), Def::Add(a, x, Carry::Without)),
        1 => (format!("ADC A,{name}"), Def::Add(a, x, Carry::With)),
        2 => (format!("SUB {name}"), Def::Sub(operand, Carry::Without)),
        3 => (format!("SBC A,{name}"), Def::Sub(operand, Carry::With)),
        4 => (format!("AND {name}"), Def::And(operand)),
        5 => (format!("XOR {name}"), Def::Xor(operand)),
        6 => (format!("OR {name}"), Def::Or(operand)),
        _ => (format!("CP {name}"), Def::Compare(operand)),
    }
}

/// 0x80-0xBF
fn alu_block(set: &mut SetBuilder) {
    for opcode in 0x80..=0xBFu8 {
        let (operand, name) = R8[(opcode & 7) as usize];
        let (mnemonic, definition) = alu((opcode >> 3) & 7, operand, name);
        let cycles = if operand == HL_PTR { 8 } else { 4 };
        set.op(opcode, mnemonic, definition, cycles);
    }
}

/// 0xC0-0xFF, except 0xCB.
fn control_block(set: &mut SetBuilder) {
    let a16 = OperandDef::Word(WordOperandDef::Immediate);

    for (i, (cond, name)) in CONDITIONS.into_iter().enumerate() {
        let column = (i as u8) << 3;
        set.branch(0xC0 | column, format!("RET {name}"), Def::Return(cond), 20, 8);
        set.branch(0xC2 | column, format!("JP {name},a16"), Def::Jump(cond, a16), 16, 12);
        set.branch(0xC4 | column, format!("CALL {name},a16"), Def::Call(cond), 24, 12);
    }
    set.op(0xC3, "JP a16", Def::Jump(Condition::Always, a16), 16);
    set.op(
        0xE9,
        "JP HL",
        Def::Jump(Condition::Always, OperandDef::Word(WordOperandDef::Register(Reg16::HL))),
        4,
    );
    set.op(0xCD, "CALL a16", Def::Call(Condition::Always), 24);
    set.op(0xC9, "RET", Def::Return(Condition::Always), 16);
    set.op(0xD9, "RETI", Def::ReturnFromInterrupt, 16);

    for (i, (pair, name)) in R16_STACK.into_iter().enumerate() {
        let row = (i as u8) << 4;
        set.op(0xC1 | row, format!("POP {name}"), Def::Pop(pair), 12);
        set.op(0xC5 | row, format!("PUSH {name}"), Def::Push(pair), 16);
    }

    for index in 0..8u8 {
        let (mnemonic, definition) = alu(index, D8, "d8");
        set.op(0xC6 | index << 3, mnemonic, definition, 8);
    }

    for (i, vector) in RESTARTS.into_iter().enumerate() {
        let opcode = 0xC7 | (i as u8) << 3;
        set.op(opcode, format!("RST {:02X}H", vector.address()), Def::Restart(vector), 16);
    }

    let high = ByteOperandDef::HighAddress;
    let high_c = ByteOperandDef::HighIndirect(Reg8::C);
    let absolute = ByteOperandDef::Address;
    let normal = LoadMode::Normal;
    set.op(0xE0, "LDH (a8),A", Def::LoadByte(normal, high, A), 12);
    set.op(0xF0, "LDH A,(a8)", Def::LoadByte(normal, A, high), 12);
    set.op(0xE2, "LD (C),A", Def::LoadByte(normal, high_c, A), 8);
    set.op(0xF2, "LD A,(C)", Def::LoadByte(normal, A, high_c), 8);
    set.op(0xEA, "LD (a16),A", Def::LoadByte(normal, absolute, A), 16);
    set.op(0xFA, "LD A,(a16)", Def::LoadByte(normal, A, absolute), 16);

    set.op(
        0xE8,
        "ADD SP,r8",
        Def::Add(
            OperandDef::Word(WordOperandDef::Register(Reg16::SP)),
            OperandDef::Relative,
            Carry::Without,
        ),
        16,
    );
    set.op(
        0xF8,
        "LD HL,SP+r8",
        Def::LoadWord(WordOperandDef::Register(Reg16::HL), WordOperandDef::Indexed(Reg16::SP)),
        12,
    );
    set.op(
        0xF9,
        "LD SP,HL",
        Def::LoadWord(WordOperandDef::Register(Reg16::SP), WordOperandDef::Register(Reg16::HL)),
        8,
    );

    set.op(0xF3, "DI", Def::Interrupts(false), 4);
    set.op(0xFB, "EI", Def::Interrupts(true), 4);

    for opcode in INVALID {
        set.op(opcode, "ILLEGAL", Def::Invalid, 4);
    }
}

/// The CB-prefixed set. Cycle counts include the prefix fetch.
fn extended() -> InstructionSet {
    let mut set = SetBuilder::new();
    for opcode in 0..=0xFFu8 {
        let (target, name) = R8[(opcode & 7) as usize];
        let memory = target == HL_PTR;
        let bit = (opcode >> 3) & 7;
        let rmw = if memory { 16 } else { 8 };

        let (mnemonic, definition, cycles) = match opcode >> 6 {
            0 => {
                let rotate = |dir, mode| Def::Rotate(dir, mode, ZeroFlag::FromResult, target);
                let (op, definition) = match bit {
                    0 => ("RLC", rotate(Direction::Left, RotateMode::Circular)),
                    1 => ("RRC", rotate(Direction::Right, RotateMode::Circular)),
                    2 => ("RL", rotate(Direction::Left, RotateMode::ThroughCarry)),
                    3 => ("RR", rotate(Direction::Right, RotateMode::ThroughCarry)),
                    4 => ("SLA", Def::Shift(Shift::LeftArithmetic, target)),
                    5 => ("SRA", Def::Shift(Shift::RightArithmetic, target)),
                    6 => ("SWAP", Def::Swap(target)),
                    _ => ("SRL", Def::Shift(Shift::RightLogical, target)),
                };
                (format!("{op} {name}"), definition, rmw)
            }
            1 => {
                let cycles = if memory { 12 } else { 8 };
                (format!("BIT {bit},{name}"), Def::TestBit(bit, target), cycles)
            }
            2 => (format!("RES {bit},{name}"), Def::ResetBit(bit, target), rmw),
            _ => (format!("SET {bit},{name}"), Def::SetBit(bit, target), rmw),
        };
        set.op(opcode, mnemonic, definition, cycles);
    }
    set.build()
}
