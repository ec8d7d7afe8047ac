use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::error::{Result, VmError};
use crate::word::Word;

/// Bytes of the most recent input line not yet consumed by `in`.
#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<u8>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next pending byte, reading one whole line from `input` first if the
    /// queue has run dry. This is the only place the machine blocks.
    pub fn next_byte<R: BufRead>(&mut self, input: &mut R) -> Result<u8> {
        if self.pending.is_empty() {
            self.refill(input)?;
        }
        self.pending
            .pop_front()
            .ok_or_else(|| VmError::InputUnavailable {
                reason: "input line was empty".into(),
            })
    }

    fn refill<R: BufRead>(&mut self, input: &mut R) -> Result<()> {
        let mut line = Vec::new();
        match input.read_until(b'\n', &mut line) {
            Ok(0) => Err(VmError::InputUnavailable {
                reason: "end of input".into(),
            }),
            Ok(_) => {
                self.pending.extend(line);
                Ok(())
            }
            Err(e) => Err(VmError::InputUnavailable {
                reason: e.to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Write the low byte of `ch`, flushing so prompts appear before `in` blocks.
pub fn write_char<W: Write>(output: &mut W, ch: Word) -> Result<()> {
    let byte = (ch & 0xFF) as u8;
    output
        .write_all(&[byte])
        .and_then(|()| output.flush())
        .map_err(|e| VmError::OutputUnavailable {
            reason: e.to_string(),
        })
}
