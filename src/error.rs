use miette::Diagnostic;
use thiserror::Error;

use crate::word::Word;

/// Which word array an out-of-bounds access was aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Memory,
    Registers,
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Registers => write!(f, "register bank"),
        }
    }
}

/// Every way a loaded program can stop the machine, other than `halt`.
#[derive(Debug, Error, Diagnostic)]
pub enum VmError {
    #[error("{region} access at {index} is out of bounds (length {len})")]
    #[diagnostic(
        code(vm::out_of_bounds),
        help("addresses must lie inside the loaded image; register indices in 0..8")
    )]
    OutOfBounds {
        region: Region,
        index: usize,
        len: usize,
    },

    #[error("decode window at {ip} runs past the end of memory (length {len})")]
    #[diagnostic(
        code(vm::out_of_bounds),
        help("the decoder always reads 4 words; the image may be truncated")
    )]
    WindowOutOfBounds { ip: usize, len: usize },

    #[error("invalid operand {raw}")]
    #[diagnostic(
        code(vm::invalid_operand),
        help("operands must be literals 0..=32767 or register references 32768..=32775")
    )]
    InvalidOperand { raw: Word },

    #[error("`mod` with a zero divisor")]
    #[diagnostic(code(vm::invalid_operand), help("the second operand of `mod` must be non-zero"))]
    ZeroModulus,

    #[error("unknown opcode {opcode}")]
    #[diagnostic(code(vm::unknown_opcode), help("valid opcodes are 0 through 21"))]
    UnknownOpcode { opcode: Word },

    #[error("stack is empty")]
    #[diagnostic(code(vm::empty_stack), help("`pop` and `ret` need a value on the stack"))]
    EmptyStack,

    #[error("no input available: {reason}")]
    #[diagnostic(code(vm::input_unavailable), help("`in` reached the end of standard input"))]
    InputUnavailable { reason: String },

    #[error("could not write output: {reason}")]
    #[diagnostic(code(vm::output_unavailable))]
    OutputUnavailable { reason: String },
}

impl VmError {
    /// Short name of the failure kind, stable across variants of the same kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OutOfBounds { .. } | Self::WindowOutOfBounds { .. } => "OutOfBounds",
            Self::InvalidOperand { .. } | Self::ZeroModulus => "InvalidOperand",
            Self::UnknownOpcode { .. } => "UnknownOpcode",
            Self::EmptyStack => "EmptyStack",
            Self::InputUnavailable { .. } => "InputUnavailable",
            Self::OutputUnavailable { .. } => "OutputUnavailable",
        }
    }
}

pub type Result<T> = std::result::Result<T, VmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_bounds_failures() {
        let memory = VmError::OutOfBounds {
            region: Region::Memory,
            index: 9,
            len: 4,
        };
        let window = VmError::WindowOutOfBounds { ip: 2, len: 4 };
        assert_eq!(memory.kind(), window.kind());
        assert_eq!(VmError::EmptyStack.kind(), "EmptyStack");
    }

    #[test]
    fn messages_carry_context() {
        let err = VmError::OutOfBounds {
            region: Region::Registers,
            index: 8,
            len: 8,
        };
        assert_eq!(
            err.to_string(),
            "register bank access at 8 is out of bounds (length 8)"
        );
        assert_eq!(
            VmError::UnknownOpcode { opcode: 22 }.to_string(),
            "unknown opcode 22"
        );
    }
}
