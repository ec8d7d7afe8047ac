use crate::error::{Region, Result, VmError};
use crate::word::{self, Word, REGISTER_COUNT};

/// Width of the decode window: opcode plus three operands.
pub const WINDOW: usize = 4;

/// Fixed-length, bounds-checked array of words.
#[derive(Clone, Debug, PartialEq, Eq)]
struct WordArray {
    cells: Box<[Word]>,
    region: Region,
}

impl WordArray {
    fn new(cells: Box<[Word]>, region: Region) -> Self {
        Self { cells, region }
    }

    fn out_of_bounds(&self, index: usize) -> VmError {
        VmError::OutOfBounds {
            region: self.region,
            index,
            len: self.cells.len(),
        }
    }

    #[inline]
    fn get(&self, index: usize) -> Result<Word> {
        self.cells
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_bounds(index))
    }

    #[inline]
    fn set(&mut self, index: usize, value: Word) -> Result<()> {
        let len = self.cells.len();
        match self.cells.get_mut(index) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(VmError::OutOfBounds {
                region: self.region,
                index,
                len,
            }),
        }
    }
}

/// Main memory. Holds the program image and doubles as data space, so writes
/// are visible to the decoder on the very next cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory(WordArray);

impl Memory {
    pub fn new(words: Vec<Word>) -> Self {
        Self(WordArray::new(words.into_boxed_slice(), Region::Memory))
    }

    /// Build memory from a raw image: two bytes per word, low byte first.
    /// A trailing odd byte is ignored.
    pub fn from_image(bytes: &[u8]) -> Self {
        let words = bytes
            .chunks_exact(2)
            .map(|pair| word::from_bytes(pair[0], pair[1]))
            .collect();
        Self::new(words)
    }

    pub fn get(&self, addr: usize) -> Result<Word> {
        self.0.get(addr)
    }

    pub fn set(&mut self, addr: usize, value: Word) -> Result<()> {
        self.0.set(addr, value)
    }

    /// Words in `start..end`. Both endpoints must be valid addresses and
    /// `start` may not exceed `end`.
    pub fn get_range(&self, start: usize, end: usize) -> Result<&[Word]> {
        let len = self.len();
        if start >= len {
            return Err(self.0.out_of_bounds(start));
        }
        if end >= len || start > end {
            return Err(self.0.out_of_bounds(end));
        }
        Ok(&self.0.cells[start..end])
    }

    /// The fixed-width lookahead the decoder reads at `ip`. The whole window
    /// must fit, however short the instruction turns out to be.
    pub fn window(&self, ip: usize) -> Result<[Word; WINDOW]> {
        let len = self.len();
        ip.checked_add(WINDOW)
            .and_then(|end| self.0.cells.get(ip..end))
            .and_then(|words| words.try_into().ok())
            .ok_or(VmError::WindowOutOfBounds { ip, len })
    }

    pub fn len(&self) -> usize {
        self.0.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.0.cells
    }
}

/// The eight general-purpose registers, indexed `0..8`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registers(WordArray);

impl Registers {
    pub fn new() -> Self {
        Self(WordArray::new(
            vec![0; REGISTER_COUNT].into_boxed_slice(),
            Region::Registers,
        ))
    }

    pub fn get(&self, index: usize) -> Result<Word> {
        self.0.get(index)
    }

    pub fn set(&mut self, index: usize, value: Word) -> Result<()> {
        self.0.set(index, value)
    }

    pub fn iter(&self) -> impl Iterator<Item = Word> + '_ {
        self.0.cells.iter().copied()
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
