use std::io::{BufRead, Write};

use crate::error::{Region, Result, VmError};
use crate::instruction::Instruction;
use crate::io::{self, InputQueue};
use crate::memory::{Memory, Registers};
use crate::stack::Stack;
use crate::word::{self, Word};

/// Whether the machine will execute another cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
}

/// Complete machine state for one program run.
pub struct RunState {
    /// Instruction pointer, an index into `mem`
    ip: usize,
    /// Address of the instruction most recently decoded
    fetched_at: usize,
    mem: Memory,
    /// 8x 16-bit registers
    reg: Registers,
    stack: Stack,
    input: InputQueue,
    running: bool,
    trace: bool,
}

impl RunState {
    pub fn new(words: Vec<Word>) -> Self {
        Self::from_memory(Memory::new(words))
    }

    pub fn from_image(bytes: &[u8]) -> Self {
        Self::from_memory(Memory::from_image(bytes))
    }

    pub fn from_memory(mem: Memory) -> Self {
        Self {
            ip: 0,
            fetched_at: 0,
            mem,
            reg: Registers::new(),
            stack: Stack::new(),
            input: InputQueue::new(),
            running: true,
            trace: false,
        }
    }

    /// Print every decoded instruction to stderr.
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Run until `halt` or the first failure.
    pub fn run<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        while self.step(input, output)? == Status::Running {}
        Ok(())
    }

    /// Execute a single cycle. Any failure halts the machine for good; a
    /// halted machine executes nothing further.
    pub fn step<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<Status>
    where
        R: BufRead,
        W: Write,
    {
        if !self.running {
            return Ok(Status::Halted);
        }
        if let Err(err) = self.cycle(input, output) {
            self.running = false;
            return Err(err);
        }
        Ok(self.status())
    }

    fn cycle<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        self.fetched_at = self.ip;
        let window = self.mem.window(self.ip)?;
        let instr = Instruction::decode(window, &self.reg)?;
        if self.trace {
            crate::output::trace(self.ip, &instr);
        }
        // IP advanced before the handler, so jumps overwrite it
        self.ip += instr.width();
        self.execute(instr, input, output)
    }

    fn execute<R, W>(&mut self, instr: Instruction, input: &mut R, output: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        use Instruction::*;
        match instr {
            Halt => self.running = false,
            Set { reg, value } => self.reg.set(reg, value)?,
            Push { value } => self.stack.push(value),
            Pop { reg } => {
                let value = self.stack.pop()?;
                self.reg.set(reg, value)?;
            }
            Eq { reg, a, b } => self.reg.set(reg, (a == b) as Word)?,
            Gt { reg, a, b } => self.reg.set(reg, (a > b) as Word)?,
            Jmp { target } => self.jump(target),
            Jt { cond, target } => {
                if cond != 0 {
                    self.jump(target);
                }
            }
            Jf { cond, target } => {
                if cond == 0 {
                    self.jump(target);
                }
            }
            Add { reg, a, b } => self.reg.set(reg, word::add(a, b))?,
            Mult { reg, a, b } => self.reg.set(reg, word::mult(a, b))?,
            Mod { reg, a, b } => {
                let value = a.checked_rem(b).ok_or(VmError::ZeroModulus)?;
                self.reg.set(reg, value)?;
            }
            And { reg, a, b } => self.reg.set(reg, a & b)?,
            Or { reg, a, b } => self.reg.set(reg, a | b)?,
            Not { reg, a } => self.reg.set(reg, word::not(a))?,
            Rmem { reg, addr } => {
                let value = self.mem.get(addr as usize)?;
                self.reg.set(reg, value)?;
            }
            Wmem { addr, value } => self.mem.set(addr as usize, value)?,
            Call { target } => {
                let ret = Word::try_from(self.ip).map_err(|_| VmError::OutOfBounds {
                    region: Region::Memory,
                    index: self.ip,
                    len: self.mem.len(),
                })?;
                self.stack.push(ret);
                self.jump(target);
            }
            Ret => {
                let target = self.stack.pop()?;
                self.jump(target);
            }
            Out { ch } => io::write_char(output, ch)?,
            In { reg } => {
                let byte = self.input.next_byte(input)?;
                self.reg.set(reg, byte as Word)?;
            }
            Noop => {}
        }
        Ok(())
    }

    #[inline]
    fn jump(&mut self, target: Word) {
        self.ip = target as usize;
    }

    pub fn status(&self) -> Status {
        if self.running {
            Status::Running
        } else {
            Status::Halted
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn fetched_at(&self) -> usize {
        self.fetched_at
    }

    pub fn register(&self, index: usize) -> Result<Word> {
        self.reg.get(index)
    }

    pub fn registers(&self) -> &Registers {
        &self.reg
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }
}
