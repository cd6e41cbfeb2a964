use crate::bits;
use crate::cpu::{Bus, Cpu};
use crate::instruction::{ByteOperand, LoadMode, WordOperand};

impl Cpu {
    pub(super) fn exec_load_byte<B: Bus>(
        &mut self,
        bus: &mut B,
        mode: LoadMode,
        dst: ByteOperand,
        src: ByteOperand,
    ) {
        self.write_operand(bus, &dst, src.value());

        // LD (HL+)/(HL-) adjust the pointer after the access.
        match mode {
            LoadMode::Normal => {}
            LoadMode::Increment(reg) => {
                let value = self.regs.get16(reg).wrapping_add(1);
                self.regs.set16(reg, value);
            }
            LoadMode::Decrement(reg) => {
                let value = self.regs.get16(reg).wrapping_sub(1);
                self.regs.set16(reg, value);
            }
        }
    }

    pub(super) fn exec_load_word<B: Bus>(&mut self, bus: &mut B, dst: WordOperand, src: WordOperand) {
        let value = match src {
            // LD HL,SP+r8 shares ADD SP,r8's flag rules.
            WordOperand::Indexed { base, offset, .. } => self.alu_add16_signed(base, offset),
            other => other.value(),
        };

        match dst {
            WordOperand::Register { reg, .. } => self.regs.set16(reg, value),
            // LD (a16),SP stores little-endian.
            WordOperand::Address { address, .. } => {
                self.write8(bus, address, bits::low_byte(value));
                self.write8(bus, address.wrapping_add(1), bits::high_byte(value));
            }
            other => panic!("unsupported word load destination: {other:?}"),
        }
    }
}
