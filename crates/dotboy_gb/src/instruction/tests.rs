use super::*;
use crate::cpu::{Bus, Cpu, Reg8};

struct TestBus {
    memory: [u8; 0x10000],
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }
}

fn decode(bytes: &[u8]) -> Decoded {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    cpu.regs.pc = 0xC000;
    bus.memory[0xC000..0xC000 + bytes.len()].copy_from_slice(bytes);
    Decoder::new(&cpu, &mut bus).decode()
}

/// Bytes a definition consumes after its opcode.
fn operand_bytes(definition: &Definition) -> u16 {
    match *definition {
        Definition::Add(a, b, _) => a.size() + b.size(),
        Definition::Sub(x, _)
        | Definition::And(x)
        | Definition::Xor(x)
        | Definition::Or(x)
        | Definition::Compare(x)
        | Definition::IncByte(x)
        | Definition::DecByte(x)
        | Definition::Rotate(_, _, _, x)
        | Definition::Shift(_, x)
        | Definition::Swap(x)
        | Definition::TestBit(_, x)
        | Definition::ResetBit(_, x)
        | Definition::SetBit(_, x) => x.size(),
        Definition::Jump(_, target) => target.size(),
        Definition::Call(_) => 2,
        Definition::LoadByte(_, dst, src) => dst.size() + src.size(),
        Definition::LoadWord(dst, src) => dst.size() + src.size(),
        _ => 0,
    }
}

fn each_instruction(mut f: impl FnMut(&[u8], &Instruction)) {
    for (opcode, entry) in INSTRUCTIONS.iter() {
        match entry {
            InstructionOrSet::Instruction(instruction) => f(&[opcode], instruction),
            InstructionOrSet::Set(nested) => {
                for (extended, entry) in nested.iter() {
                    match entry {
                        InstructionOrSet::Instruction(instruction) => {
                            f(&[opcode, extended], instruction)
                        }
                        InstructionOrSet::Set(_) => panic!("nested sets are one level deep"),
                    }
                }
            }
        }
    }
}

#[test]
fn table_covers_every_opcode() {
    let mut count = 0;
    each_instruction(|_, _| count += 1);
    assert_eq!(count, 255 + 256);
    assert!(matches!(INSTRUCTIONS.get(0xCB), InstructionOrSet::Set(_)));
}

#[test]
#[should_panic(expected = "missing opcode 00")]
fn incomplete_set_is_rejected() {
    InstructionSet::new((0..256).map(|_| None).collect());
}

#[test]
fn disassembling_definition_reproduces_mnemonic() {
    each_instruction(|opcode, instruction| {
        assert_eq!(
            disassemble_definition(&instruction.definition),
            instruction.mnemonic,
            "opcode {opcode:02X?}"
        );
    });
}

#[test]
fn decoded_shape_matches_definition() {
    each_instruction(|opcode, instruction| {
        let decoded = decode(opcode);
        assert_eq!(
            decoded.operation.definition(),
            instruction.definition,
            "opcode {opcode:02X?}"
        );
        let expected = opcode.len() as u16 + operand_bytes(&instruction.definition);
        assert_eq!(decoded.length, expected, "opcode {opcode:02X?}");
    });
}

#[test]
fn conditional_timing_follows_flags() {
    // JR NZ with Z clear after reset.
    assert_eq!(decode(&[0x20, 0x05]).cycles, 12);
    // JR Z is not taken.
    assert_eq!(decode(&[0x28, 0x05]).cycles, 8);
    assert_eq!(decode(&[0xC4, 0x00, 0x10]).cycles, 24);
    assert_eq!(decode(&[0xD8]).cycles, 8);
}

#[test]
fn invalid_opcodes_decode_to_invalid() {
    for opcode in [0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD] {
        let decoded = decode(&[opcode]);
        assert_eq!(
            decoded.operation,
            Operation::Invalid {
                address: 0xC000,
                opcode
            }
        );
        assert_eq!(decoded.length, 1);
    }
}

#[test]
fn operands_are_fetched_left_to_right() {
    let decoded = decode(&[0x06, 0x12]);
    assert_eq!(
        decoded.operation,
        Operation::LoadByte(
            LoadMode::Normal,
            ByteOperand::Register {
                reg: Reg8::B,
                value: 0
            },
            ByteOperand::Immediate(0x12)
        )
    );

    let decoded = decode(&[0xEA, 0x34, 0x12]);
    match decoded.operation {
        Operation::LoadByte(_, ByteOperand::Address { address, .. }, _) => {
            assert_eq!(address, 0x1234)
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn indirect_operand_snapshots_memory() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    cpu.regs.pc = 0xC000;
    cpu.regs.set_hl(0xD000);
    bus.memory[0xC000] = 0x7E; // LD A,(HL)
    bus.memory[0xD000] = 0x99;
    let decoded = Decoder::new(&cpu, &mut bus).decode();
    match decoded.operation {
        Operation::LoadByte(_, _, src) => {
            assert_eq!(src.address(), Some(0xD000));
            assert_eq!(src.value(), 0x99);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn high_address_is_in_page_ff() {
    let decoded = decode(&[0xF0, 0x44]);
    match decoded.operation {
        Operation::LoadByte(_, _, src) => assert_eq!(src.address(), Some(0xFF44)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn operation_disassembly_fills_in_values() {
    assert_eq!(decode(&[0x06, 0x12]).operation.to_string(), "LD B,$12");
    assert_eq!(decode(&[0x20, 0xFD]).operation.to_string(), "JR NZ,-3");
    assert_eq!(decode(&[0x18, 0x05]).operation.to_string(), "JR +5");
    assert_eq!(decode(&[0xE0, 0x40]).operation.to_string(), "LDH ($FF40),A");
    assert_eq!(decode(&[0xCD, 0x00, 0x40]).operation.to_string(), "CALL $4000");
    assert_eq!(decode(&[0xF8, 0xFE]).operation.to_string(), "LD HL,SP-2");
    assert_eq!(decode(&[0x01, 0xEF, 0xBE]).operation.to_string(), "LD BC,$BEEF");
    assert_eq!(decode(&[0x22]).operation.to_string(), "LD (HL+),A");
    assert_eq!(decode(&[0xCB, 0x7C]).operation.to_string(), "BIT 7,H");
    assert_eq!(decode(&[0xFF]).operation.to_string(), "RST 38H");
    assert_eq!(decode(&[0xDD]).operation.to_string(), "ILLEGAL $DD");
}

#[test]
fn sample_mnemonics() {
    let mnemonic = |opcode: u8| match INSTRUCTIONS.get(opcode) {
        InstructionOrSet::Instruction(instruction) => instruction.mnemonic.to_string(),
        InstructionOrSet::Set(_) => "PREFIX".to_string(),
    };
    assert_eq!(mnemonic(0x00), "NOP");
    assert_eq!(mnemonic(0x36), "LD (HL),d8");
    assert_eq!(mnemonic(0x76), "HALT");
    assert_eq!(mnemonic(0x9E), "SBC A,(HL)");
    assert_eq!(mnemonic(0xE8), "ADD SP,r8");
    assert_eq!(mnemonic(0xF8), "LD HL,SP+r8");
    assert_eq!(mnemonic(0xCB), "PREFIX");
}
