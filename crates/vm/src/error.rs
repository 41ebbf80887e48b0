//! Structural faults raised while executing a program.

use crate::core::types::Word;

/// A fault that terminates the current run.
///
/// Faults are never returned from [`VM::run`](crate::core::vm::VM::run); the engine records them
/// in the [`Halt`](crate::core::vm::Halt) reason of the run instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The fetched word is not a defined opcode, or its dispatch key has no handler.
    #[error("unknown opcode {opcode} at {address}")]
    UnknownOpcode {
        /// The word that was fetched
        opcode: Word,
        /// Where it was fetched from
        address: usize,
    },

    /// An opcode needed more values than the stack held.
    #[error("stack underflow: needed {needed} value(s), found {available}")]
    StackUnderflow {
        /// Values the opcode pops
        needed: usize,
        /// Values that were on the stack
        available: usize,
    },

    /// An operand was read past the end of the program.
    #[error("operand fetch out of bounds at {address} (program length {length})")]
    OperandOutOfBounds {
        /// The address that was read
        address: usize,
        /// The length of the program at the time of the read
        length: usize,
    },

    /// A taken jump pointed outside the program.
    #[error("invalid jump destination {destination} (program length {length})")]
    InvalidJump {
        /// The requested destination
        destination: Word,
        /// The length of the program
        length: usize,
    },

    /// A checksum opcode named a range that is not inside the program.
    #[error("checksum range (start {start}, len {len}) outside program of length {length}")]
    ChecksumRange {
        /// First word of the range
        start: Word,
        /// Number of words in the range
        len: Word,
        /// The length of the program
        length: usize,
    },
}
