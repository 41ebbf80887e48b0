//! Word-level program builder.
//!
//! ```
//! use warden_auth::assembler::Assembler;
//! use warden_vm::core::opcodes::{JUMP_IF_EQUAL, PUSH, RET};
//!
//! let mut asm = Assembler::new();
//! asm.emit(PUSH, &[1]);
//! let jump = asm.emit(JUMP_IF_EQUAL, &[0]);
//! asm.emit(RET, &[]);
//! let target = asm.here();
//! asm.emit(PUSH, &[2]);
//! asm.patch(jump + 1, target as i32).expect("in bounds");
//!
//! assert_eq!(asm.finish(), vec![PUSH, 1, JUMP_IF_EQUAL, 5, RET, PUSH, 2]);
//! ```

use warden_vm::core::{
    integrity::fold,
    opcodes::{MUTATE, PUSH_JUNK},
    types::Word,
};

use crate::error::Error;

/// Host-side checksum of `words`, identical to what `checksum_push` computes at run time.
pub fn checksum(words: &[Word]) -> Word {
    fold(words)
}

/// Builds a program word by word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembler {
    words: Vec<Word>,
}

impl Assembler {
    /// Creates an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// The address the next word will be written to.
    pub fn here(&self) -> usize {
        self.words.len()
    }

    /// The words emitted so far.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Appends `opcode` followed by `operands`. Returns the opcode's address.
    pub fn emit(&mut self, opcode: Word, operands: &[Word]) -> usize {
        let address = self.here();
        self.words.push(opcode);
        self.words.extend_from_slice(operands);
        address
    }

    /// Appends an instruction followed by `mutate <address> push_junk`, which overwrites the
    /// instruction's opcode once it has executed. Static dumps taken after a run no longer show
    /// the original opcode. Returns the instruction's address.
    pub fn emit_obfuscated(&mut self, opcode: Word, operands: &[Word]) -> usize {
        let address = self.emit(opcode, operands);
        self.words.extend([MUTATE, address as Word, PUSH_JUNK]);
        address
    }

    /// Overwrites the word at `address`.
    pub fn patch(&mut self, address: usize, value: Word) -> Result<(), Error> {
        let length = self.words.len();
        match self.words.get_mut(address) {
            Some(word) => {
                *word = value;
                Ok(())
            }
            None => Err(Error::PatchOutOfBounds { address, length }),
        }
    }

    /// Returns the finished program.
    pub fn finish(self) -> Vec<Word> {
        self.words
    }
}
