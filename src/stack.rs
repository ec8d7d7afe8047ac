use crate::error::{Result, VmError};
use crate::word::Word;

/// Unbounded LIFO of words, shared by `push`/`pop` and `call`/`ret`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stack(Vec<Word>);

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Word) {
        self.0.push(value);
    }

    pub fn pop(&mut self) -> Result<Word> {
        self.0.pop().ok_or(VmError::EmptyStack)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Topmost value last.
    pub fn as_slice(&self) -> &[Word] {
        &self.0
    }
}
