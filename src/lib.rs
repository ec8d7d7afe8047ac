//! A virtual machine for a 15-bit word machine with eight registers, an
//! unbounded stack and 22 instructions.
//!
//! Programs are flat little-endian images of 16-bit words, loaded at
//! address 0 and executed until `halt` or the first fault.

// Machine parts
pub mod word;
mod memory;
pub use memory::{Memory, Registers};
mod operand;
pub use operand::{register, value, Operand};
mod stack;
pub use stack::Stack;

// Decoding and running
mod instruction;
pub use instruction::{Instruction, Opcode};
mod io;
pub use io::InputQueue;
mod runtime;
pub use runtime::{RunState, Status};

mod error;
pub use error::{Region, VmError};

pub mod output;
