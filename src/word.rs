//! The 16-bit storage cell and its 15-bit arithmetic.

/// Storage unit for memory, registers and the stack.
///
/// Values live in `0..=32767`; the upper range is reserved for register
/// references inside instruction operands.
pub type Word = u16;

/// All arithmetic wraps at this modulus.
pub const MODULUS: u32 = 32768;

/// Largest value a handler may store.
pub const MAX_VALUE: Word = 0x7FFF;

/// Register `i` is referenced in operands as `REGISTER_BASE + i`.
pub const REGISTER_BASE: Word = 32768;

pub const REGISTER_COUNT: usize = 8;

#[inline]
pub fn add(a: Word, b: Word) -> Word {
    ((a as u32 + b as u32) % MODULUS) as Word
}

#[inline]
pub fn mult(a: Word, b: Word) -> Word {
    ((a as u32 * b as u32) % MODULUS) as Word
}

/// 15-bit complement.
#[inline]
pub fn not(a: Word) -> Word {
    !a & MAX_VALUE
}

/// Little-endian pair of bytes, low byte first.
#[inline]
pub fn from_bytes(low: u8, high: u8) -> Word {
    Word::from_le_bytes([low, high])
}
