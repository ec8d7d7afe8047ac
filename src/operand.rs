//! Operand words come in two flavours, depending on the operand's role.
//!
//! A *source* operand is read as a value: literals stand for themselves and
//! register references stand for the register's contents. A *destination*
//! operand names a register to write, and must be a register reference.

use crate::error::{Result, VmError};
use crate::memory::Registers;
use crate::word::{Word, MAX_VALUE, REGISTER_BASE, REGISTER_COUNT};

/// Raw operand word, classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Literal(Word),
    Register(usize),
}

impl Operand {
    pub fn classify(raw: Word) -> Result<Self> {
        match raw {
            0..=MAX_VALUE => Ok(Self::Literal(raw)),
            _ => register(raw).map(Self::Register),
        }
    }
}

/// Resolve a source operand to the value it denotes.
pub fn value(raw: Word, registers: &Registers) -> Result<Word> {
    match Operand::classify(raw)? {
        Operand::Literal(value) => Ok(value),
        Operand::Register(index) => registers.get(index),
    }
}

/// Extract the register index named by a destination operand.
pub fn register(raw: Word) -> Result<usize> {
    let index = raw.wrapping_sub(REGISTER_BASE) as usize;
    if raw >= REGISTER_BASE && index < REGISTER_COUNT {
        Ok(index)
    } else {
        Err(VmError::InvalidOperand { raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(Operand::classify(0).unwrap(), Operand::Literal(0));
        assert_eq!(Operand::classify(32767).unwrap(), Operand::Literal(32767));
        assert_eq!(Operand::classify(32768).unwrap(), Operand::Register(0));
        assert_eq!(Operand::classify(32775).unwrap(), Operand::Register(7));
        assert!(matches!(
            Operand::classify(32776),
            Err(VmError::InvalidOperand { raw: 32776 })
        ));
        assert!(Operand::classify(Word::MAX).is_err());
    }

    #[test]
    fn value_reads_through_registers() {
        let mut registers = Registers::new();
        registers.set(3, 1234).unwrap();
        assert_eq!(value(1234, &registers).unwrap(), 1234);
        assert_eq!(value(32771, &registers).unwrap(), 1234);
        assert_eq!(value(32768, &registers).unwrap(), 0);
        assert!(value(40000, &registers).is_err());
    }

    #[test]
    fn register_rejects_literals() {
        for i in 0..8 {
            assert_eq!(register(REGISTER_BASE + i as Word).unwrap(), i);
        }
        assert!(matches!(register(5), Err(VmError::InvalidOperand { raw: 5 })));
        assert!(register(32767).is_err());
        assert!(register(32776).is_err());
    }
}
