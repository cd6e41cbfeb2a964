//! Bit and word helpers shared by the CPU, GPU and bus.
//!
//! Everything here is pure and total: callers assign the returned value back
//! instead of mutating in place.

#[inline]
pub fn bit(value: u8, n: u8) -> bool {
    debug_assert!(n < 8);
    value & (1 << n) != 0
}

/// `value` with bit `n` forced to `set`.
#[inline]
pub fn with_bit(value: u8, n: u8, set: bool) -> u8 {
    debug_assert!(n < 8);
    if set {
        value | (1 << n)
    } else {
        value & !(1 << n)
    }
}

#[inline]
pub fn word(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low])
}

#[inline]
pub fn high_byte(value: u16) -> u8 {
    (value >> 8) as u8
}

#[inline]
pub fn low_byte(value: u16) -> u8 {
    value as u8
}

#[inline]
pub fn swap_nibbles(value: u8) -> u8 {
    value.rotate_left(4)
}

/// Apply a signed displacement to an address, wrapping mod 65536.
#[inline]
pub fn offset(base: u16, displacement: i8) -> u16 {
    base.wrapping_add(displacement as i16 as u16)
}
