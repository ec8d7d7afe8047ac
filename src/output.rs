//! Everything the process prints besides the program's own output.
//!
//! Status lines go to stdout and are dropped entirely with `--minimal`.
//! Traces and state dumps go to stderr, uncoloured with `--minimal`.

use std::cell::RefCell;
use std::path::Path;

use colored::{ColoredString, Colorize};

use crate::instruction::Instruction;
use crate::runtime::RunState;

thread_local! {
    static IS_MINIMAL: RefCell<bool> = const { RefCell::new(false) };
}

pub fn set_minimal(new_value: bool) -> bool {
    IS_MINIMAL.with(|value| value.replace(new_value))
}

pub fn is_minimal() -> bool {
    IS_MINIMAL.with(|value| *value.borrow())
}

#[derive(Clone, Copy, Debug)]
pub enum MsgColor {
    Green,
    Cyan,
    Yellow,
    Red,
}

/// Right-aligned coloured tag followed by a message.
pub fn message(color: MsgColor, left: &str, right: &str) {
    if is_minimal() {
        return;
    }
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Yellow => left.yellow(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

pub fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

fn debug_str(string: &str) -> ColoredString {
    if is_minimal() {
        string.normal()
    } else {
        string.blue()
    }
}

/// One line per decoded instruction.
pub fn trace(ip: usize, instr: &Instruction) {
    let text = instr.to_string();
    let line = format!("{ip:>5}  {text:<24} ({} words)", instr.width());
    eprintln!("{}", debug_str(&line));
}

/// Registers, instruction pointer and stack depth.
pub fn print_state(state: &RunState) {
    let mut lines = Vec::with_capacity(10);
    for (i, value) in state.registers().iter().enumerate() {
        lines.push(format!("R{i} {value}"));
    }
    lines.push(format!("IP {}", state.ip()));
    lines.push(format!("SP {}", state.stack().len()));
    for line in lines {
        eprintln!("{}", debug_str(&line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_flag_round_trips() {
        let previous = set_minimal(true);
        assert!(is_minimal());
        assert!(set_minimal(previous));
        assert_eq!(is_minimal(), previous);
    }
}
