use crate::error::Error;

use super::{
    integrity::fold,
    types::{to_address, Word},
};

/// The [`Program`] struct is the VM's code, which doubles as mutable data.
///
/// Opcodes and immediates share one flat buffer of [`Word`]s. Any word can be patched while the
/// program runs, including words that were already executed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Program {
    /// The words of the program.
    pub words: Vec<Word>,
}

impl Program {
    /// Creates a new [`Program`] from the given words.
    pub fn new(words: &[Word]) -> Program {
        Program { words: words.to_vec() }
    }

    /// Number of words in the program.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the program has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Get the word at `address`, if it exists.
    pub fn get(&self, address: usize) -> Option<Word> {
        self.words.get(address).copied()
    }

    /// Read the word at `address`, faulting when it lies past the end of the program.
    ///
    /// ```
    /// use warden_vm::core::program::Program;
    ///
    /// let program = Program::new(&[0, 42]);
    /// assert_eq!(program.fetch(1), Ok(42));
    /// assert!(program.fetch(2).is_err());
    /// ```
    pub fn fetch(&self, address: usize) -> Result<Word, Error> {
        self.get(address).ok_or(Error::OperandOutOfBounds { address, length: self.len() })
    }

    /// Overwrite the word at `address` with `value`.
    ///
    /// Addresses that are negative or past the end are ignored, so a patch aimed outside the
    /// program never faults. Returns whether a word was written.
    ///
    /// ```
    /// use warden_vm::core::program::Program;
    ///
    /// let mut program = Program::new(&[1, 2, 3]);
    /// assert!(program.mutate(0, 8));
    /// assert!(!program.mutate(3, 8));
    /// assert!(!program.mutate(-1, 8));
    /// assert_eq!(program.words, vec![8, 2, 3]);
    /// ```
    pub fn mutate(&mut self, address: Word, value: Word) -> bool {
        match to_address(address).and_then(|address| self.words.get_mut(address)) {
            Some(word) => {
                *word = value;
                true
            }
            None => false,
        }
    }

    /// Get the half-open range `[start, start + len)` of the program.
    ///
    /// An empty range is valid anywhere up to and including the end of the program.
    pub fn range(&self, start: Word, len: Word) -> Result<&[Word], Error> {
        let out_of_range = || Error::ChecksumRange { start, len, length: self.len() };

        let first = to_address(start).ok_or_else(out_of_range)?;
        let count = to_address(len).ok_or_else(out_of_range)?;
        let end = first.checked_add(count).ok_or_else(out_of_range)?;

        self.words.get(first..end).ok_or_else(out_of_range)
    }

    /// XOR-fold of the range `[start, start + len)`.
    ///
    /// ```
    /// use warden_vm::core::program::Program;
    ///
    /// let program = Program::new(&[1, 2, 4, 8]);
    /// assert_eq!(program.checksum(1, 2), Ok(6));
    /// assert_eq!(program.checksum(4, 0), Ok(0));
    /// assert!(program.checksum(3, 2).is_err());
    /// ```
    pub fn checksum(&self, start: Word, len: Word) -> Result<Word, Error> {
        self.range(start, len).map(fold)
    }
}

impl From<Vec<Word>> for Program {
    fn from(words: Vec<Word>) -> Self {
        Program { words }
    }
}
