use super::{Cpu, Flag};
use crate::bits;
use crate::instruction::{Direction, RotateMode, Shift, ZeroFlag};

impl Cpu {
    #[inline]
    fn set_znhc(&mut self, z: bool, n: bool, h: bool, c: bool) {
        self.set_flag(Flag::Z, z);
        self.set_flag(Flag::N, n);
        self.set_flag(Flag::H, h);
        self.set_flag(Flag::C, c);
    }

    /// Core 8-bit ADD/ADC.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    pub(super) fn alu_add(&mut self, a: u8, value: u8, use_carry: bool) -> u8 {
        let carry_in = u8::from(use_carry && self.flag(Flag::C));

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = u16::from(a) + u16::from(value) + u16::from(carry_in);
        let result = full as u8;

        self.set_znhc(result == 0, false, half > 0x0F, full > 0xFF);
        result
    }

    /// Core 8-bit SUB/SBC. Also backs CP, which discards the result.
    pub(super) fn alu_sub(&mut self, a: u8, value: u8, use_carry: bool) -> u8 {
        let carry_in = i16::from(use_carry && self.flag(Flag::C));

        let half = i16::from(a & 0x0F) - i16::from(value & 0x0F) - carry_in;
        let full = i16::from(a) - i16::from(value) - carry_in;
        let result = full as u8;

        self.set_znhc(result == 0, true, half < 0, full < 0);
        result
    }

    #[inline]
    pub(super) fn alu_and(&mut self, a: u8, value: u8) -> u8 {
        let result = a & value;
        self.set_znhc(result == 0, false, true, false);
        result
    }

    #[inline]
    pub(super) fn alu_or(&mut self, a: u8, value: u8) -> u8 {
        let result = a | value;
        self.set_znhc(result == 0, false, false, false);
        result
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, a: u8, value: u8) -> u8 {
        let result = a ^ value;
        self.set_znhc(result == 0, false, false, false);
        result
    }

    /// INC r / INC (HL). C is preserved.
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (result & 0x0F) == 0);
        result
    }

    /// DEC r / DEC (HL). C is preserved.
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, (result & 0x0F) == 0x0F);
        result
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Updates Z, H, C; leaves N unchanged.
    pub(super) fn alu_daa(&mut self, a: u8) -> u8 {
        let mut adjust: u8 = if self.flag(Flag::C) { 0x60 } else { 0x00 };
        if self.flag(Flag::H) {
            adjust |= 0x06;
        }

        let result = if self.flag(Flag::N) {
            a.wrapping_sub(adjust)
        } else {
            if (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a.wrapping_add(adjust)
        };

        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, adjust >= 0x60);
        result
    }

    /// ADD HL,rr: H from bit 11, C from bit 15, Z untouched.
    pub(super) fn alu_add16_hl(&mut self, hl: u16, value: u16) -> u16 {
        let (result, carry) = hl.overflowing_add(value);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_flag(Flag::C, carry);
        result
    }

    /// ADD SP,r8 and LD HL,SP+r8. Carries come from the low byte; Z and N
    /// are cleared.
    pub(super) fn alu_add16_signed(&mut self, base: u16, offset: i8) -> u16 {
        let result = bits::offset(base, offset);
        let carries = base ^ (offset as i16 as u16) ^ result;
        self.set_znhc(false, false, carries & 0x10 != 0, carries & 0x100 != 0);
        result
    }

    pub(super) fn alu_rotate(
        &mut self,
        value: u8,
        direction: Direction,
        mode: RotateMode,
        zero: ZeroFlag,
    ) -> u8 {
        let carry_in = self.flag(Flag::C);
        let (result, carry_out) = match direction {
            Direction::Left => {
                let out = bits::bit(value, 7);
                let fill = match mode {
                    RotateMode::Circular => out,
                    RotateMode::ThroughCarry => carry_in,
                };
                ((value << 1) | u8::from(fill), out)
            }
            Direction::Right => {
                let out = bits::bit(value, 0);
                let fill = match mode {
                    RotateMode::Circular => out,
                    RotateMode::ThroughCarry => carry_in,
                };
                ((value >> 1) | (u8::from(fill) << 7), out)
            }
        };
        let z = match zero {
            ZeroFlag::Clear => false,
            ZeroFlag::FromResult => result == 0,
        };
        self.set_znhc(z, false, false, carry_out);
        result
    }

    pub(super) fn alu_shift(&mut self, value: u8, kind: Shift) -> u8 {
        let (result, carry_out) = match kind {
            Shift::LeftArithmetic => (value << 1, bits::bit(value, 7)),
            Shift::RightArithmetic => ((value >> 1) | (value & 0x80), bits::bit(value, 0)),
            Shift::RightLogical => (value >> 1, bits::bit(value, 0)),
        };
        self.set_znhc(result == 0, false, false, carry_out);
        result
    }

    pub(super) fn alu_swap(&mut self, value: u8) -> u8 {
        let result = bits::swap_nibbles(value);
        self.set_znhc(result == 0, false, false, false);
        result
    }

    /// BIT n: Z reflects the inverted bit, C is preserved.
    pub(super) fn alu_bit(&mut self, value: u8, n: u8) {
        self.set_flag(Flag::Z, !bits::bit(value, n));
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, true);
    }
}
