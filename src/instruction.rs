use std::fmt;

use crate::error::{Result, VmError};
use crate::memory::{Registers, WINDOW};
use crate::operand;
use crate::word::Word;

/// Numeric opcodes, in encoding order.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Halt = 0,
    Set = 1,
    Push = 2,
    Pop = 3,
    Eq = 4,
    Gt = 5,
    Jmp = 6,
    Jt = 7,
    Jf = 8,
    Add = 9,
    Mult = 10,
    Mod = 11,
    And = 12,
    Or = 13,
    Not = 14,
    Rmem = 15,
    Wmem = 16,
    Call = 17,
    Ret = 18,
    Out = 19,
    In = 20,
    Noop = 21,
}

impl Opcode {
    const ALL: [Opcode; 22] = [
        Self::Halt,
        Self::Set,
        Self::Push,
        Self::Pop,
        Self::Eq,
        Self::Gt,
        Self::Jmp,
        Self::Jt,
        Self::Jf,
        Self::Add,
        Self::Mult,
        Self::Mod,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Rmem,
        Self::Wmem,
        Self::Call,
        Self::Ret,
        Self::Out,
        Self::In,
        Self::Noop,
    ];

    /// Encoded length in words, opcode included.
    pub fn width(self) -> usize {
        match self {
            Self::Halt | Self::Ret | Self::Noop => 1,
            Self::Push | Self::Pop | Self::Jmp | Self::Call | Self::Out | Self::In => 2,
            Self::Set | Self::Jt | Self::Jf | Self::Not | Self::Rmem | Self::Wmem => 3,
            Self::Eq | Self::Gt | Self::Add | Self::Mult | Self::Mod | Self::And | Self::Or => 4,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Halt => "halt",
            Self::Set => "set",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::Jmp => "jmp",
            Self::Jt => "jt",
            Self::Jf => "jf",
            Self::Add => "add",
            Self::Mult => "mult",
            Self::Mod => "mod",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Rmem => "rmem",
            Self::Wmem => "wmem",
            Self::Call => "call",
            Self::Ret => "ret",
            Self::Out => "out",
            Self::In => "in",
            Self::Noop => "noop",
        }
    }
}

impl TryFrom<Word> for Opcode {
    type Error = VmError;

    fn try_from(opcode: Word) -> Result<Self> {
        Self::ALL
            .get(opcode as usize)
            .copied()
            .ok_or(VmError::UnknownOpcode { opcode })
    }
}

/// A decoded instruction.
///
/// Source operands are already resolved to values; destinations are register
/// indices in `0..8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Halt,
    Set { reg: usize, value: Word },
    Push { value: Word },
    Pop { reg: usize },
    Eq { reg: usize, a: Word, b: Word },
    Gt { reg: usize, a: Word, b: Word },
    Jmp { target: Word },
    Jt { cond: Word, target: Word },
    Jf { cond: Word, target: Word },
    Add { reg: usize, a: Word, b: Word },
    Mult { reg: usize, a: Word, b: Word },
    Mod { reg: usize, a: Word, b: Word },
    And { reg: usize, a: Word, b: Word },
    Or { reg: usize, a: Word, b: Word },
    Not { reg: usize, a: Word },
    Rmem { reg: usize, addr: Word },
    Wmem { addr: Word, value: Word },
    Call { target: Word },
    Ret,
    Out { ch: Word },
    In { reg: usize },
    Noop,
}

impl Instruction {
    /// Decode the instruction at the start of `window`, resolving source
    /// operands against the current register contents.
    pub fn decode(window: [Word; WINDOW], registers: &Registers) -> Result<Self> {
        let [opcode, x, y, z] = window;
        let val = |raw| operand::value(raw, registers);
        let reg = operand::register;

        let instr = match Opcode::try_from(opcode)? {
            Opcode::Halt => Self::Halt,
            Opcode::Set => Self::Set {
                reg: reg(x)?,
                value: val(y)?,
            },
            Opcode::Push => Self::Push { value: val(x)? },
            Opcode::Pop => Self::Pop { reg: reg(x)? },
            Opcode::Eq => Self::Eq {
                reg: reg(x)?,
                a: val(y)?,
                b: val(z)?,
            },
            Opcode::Gt => Self::Gt {
                reg: reg(x)?,
                a: val(y)?,
                b: val(z)?,
            },
            Opcode::Jmp => Self::Jmp { target: val(x)? },
            Opcode::Jt => Self::Jt {
                cond: val(x)?,
                target: val(y)?,
            },
            Opcode::Jf => Self::Jf {
                cond: val(x)?,
                target: val(y)?,
            },
            Opcode::Add => Self::Add {
                reg: reg(x)?,
                a: val(y)?,
                b: val(z)?,
            },
            Opcode::Mult => Self::Mult {
                reg: reg(x)?,
                a: val(y)?,
                b: val(z)?,
            },
            Opcode::Mod => Self::Mod {
                reg: reg(x)?,
                a: val(y)?,
                b: val(z)?,
            },
            Opcode::And => Self::And {
                reg: reg(x)?,
                a: val(y)?,
                b: val(z)?,
            },
            Opcode::Or => Self::Or {
                reg: reg(x)?,
                a: val(y)?,
                b: val(z)?,
            },
            Opcode::Not => Self::Not {
                reg: reg(x)?,
                a: val(y)?,
            },
            Opcode::Rmem => Self::Rmem {
                reg: reg(x)?,
                addr: val(y)?,
            },
            Opcode::Wmem => Self::Wmem {
                addr: val(x)?,
                value: val(y)?,
            },
            Opcode::Call => Self::Call { target: val(x)? },
            Opcode::Ret => Self::Ret,
            Opcode::Out => Self::Out { ch: val(x)? },
            Opcode::In => Self::In { reg: reg(x)? },
            Opcode::Noop => Self::Noop,
        };
        Ok(instr)
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Halt => Opcode::Halt,
            Self::Set { .. } => Opcode::Set,
            Self::Push { .. } => Opcode::Push,
            Self::Pop { .. } => Opcode::Pop,
            Self::Eq { .. } => Opcode::Eq,
            Self::Gt { .. } => Opcode::Gt,
            Self::Jmp { .. } => Opcode::Jmp,
            Self::Jt { .. } => Opcode::Jt,
            Self::Jf { .. } => Opcode::Jf,
            Self::Add { .. } => Opcode::Add,
            Self::Mult { .. } => Opcode::Mult,
            Self::Mod { .. } => Opcode::Mod,
            Self::And { .. } => Opcode::And,
            Self::Or { .. } => Opcode::Or,
            Self::Not { .. } => Opcode::Not,
            Self::Rmem { .. } => Opcode::Rmem,
            Self::Wmem { .. } => Opcode::Wmem,
            Self::Call { .. } => Opcode::Call,
            Self::Ret => Opcode::Ret,
            Self::Out { .. } => Opcode::Out,
            Self::In { .. } => Opcode::In,
            Self::Noop => Opcode::Noop,
        }
    }

    /// Encoded length in words.
    pub fn width(&self) -> usize {
        self.opcode().width()
    }
}

/// Displays a character operand as a quoted char when printable.
struct CharOperand(Word);

impl fmt::Display for CharOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0x20..=0x7e => write!(f, "{:?}", self.0 as u8 as char),
            0x0a => write!(f, "'\\n'"),
            value => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.opcode().mnemonic();
        match *self {
            Self::Halt | Self::Ret | Self::Noop => write!(f, "{name}"),
            Self::Set { reg, value } => write!(f, "{name} r{reg} {value}"),
            Self::Push { value } => write!(f, "{name} {value}"),
            Self::Pop { reg } | Self::In { reg } => write!(f, "{name} r{reg}"),
            Self::Eq { reg, a, b }
            | Self::Gt { reg, a, b }
            | Self::Add { reg, a, b }
            | Self::Mult { reg, a, b }
            | Self::Mod { reg, a, b }
            | Self::And { reg, a, b }
            | Self::Or { reg, a, b } => write!(f, "{name} r{reg} {a} {b}"),
            Self::Not { reg, a } => write!(f, "{name} r{reg} {a}"),
            Self::Rmem { reg, addr } => write!(f, "{name} r{reg} [{addr}]"),
            Self::Wmem { addr, value } => write!(f, "{name} [{addr}] {value}"),
            Self::Jmp { target } | Self::Call { target } => write!(f, "{name} {target}"),
            Self::Jt { cond, target } | Self::Jf { cond, target } => {
                write!(f, "{name} {cond} {target}")
            }
            Self::Out { ch } => write!(f, "{name} {}", CharOperand(ch)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(window: [Word; 4]) -> Result<Instruction> {
        Instruction::decode(window, &Registers::new())
    }

    #[test]
    fn opcode_round_trip() {
        for (n, opcode) in Opcode::ALL.iter().enumerate() {
            assert_eq!(Opcode::try_from(n as Word).unwrap(), *opcode);
            assert_eq!(*opcode as Word, n as Word);
        }
        assert!(matches!(
            Opcode::try_from(22),
            Err(VmError::UnknownOpcode { opcode: 22 })
        ));
    }

    #[test]
    fn widths() {
        assert_eq!(Opcode::Halt.width(), 1);
        assert_eq!(Opcode::Set.width(), 3);
        assert_eq!(Opcode::Push.width(), 2);
        assert_eq!(Opcode::Eq.width(), 4);
        assert_eq!(Opcode::Wmem.width(), 3);
        assert_eq!(Opcode::Call.width(), 2);
        assert_eq!(Opcode::In.width(), 2);
        assert_eq!(Opcode::Noop.width(), 1);
    }

    #[test]
    fn destinations_stay_indices() {
        let mut registers = Registers::new();
        registers.set(1, 77).unwrap();
        let instr = Instruction::decode([9, 32768, 32769, 3], &registers).unwrap();
        assert_eq!(instr, Instruction::Add { reg: 0, a: 77, b: 3 });
        assert_eq!(instr.width(), 4);
    }

    #[test]
    fn unused_window_words_are_ignored() {
        // Trailing words belong to the next instruction and may be anything.
        assert_eq!(decode([0, 65535, 65535, 65535]).unwrap(), Instruction::Halt);
        assert_eq!(
            decode([2, 5, 65535, 65535]).unwrap(),
            Instruction::Push { value: 5 }
        );
    }

    #[test]
    fn invalid_operands() {
        assert!(matches!(
            decode([1, 32776, 5, 0]),
            Err(VmError::InvalidOperand { raw: 32776 })
        ));
        // literal where a register is required
        assert!(matches!(
            decode([3, 7, 0, 0]),
            Err(VmError::InvalidOperand { raw: 7 })
        ));
        assert!(matches!(
            decode([19, 40000, 0, 0]),
            Err(VmError::InvalidOperand { raw: 40000 })
        ));
    }

    #[test]
    fn display() {
        assert_eq!(decode([1, 32768, 5, 0]).unwrap().to_string(), "set r0 5");
        assert_eq!(decode([19, 65, 0, 0]).unwrap().to_string(), "out 'A'");
        assert_eq!(decode([19, 10, 0, 0]).unwrap().to_string(), "out '\\n'");
        assert_eq!(decode([16, 100, 7, 0]).unwrap().to_string(), "wmem [100] 7");
        assert_eq!(decode([18, 0, 0, 0]).unwrap().to_string(), "ret");
    }
}
