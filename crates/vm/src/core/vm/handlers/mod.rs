//! Opcode handlers organized by category.
//!
//! Every handler has the [`Handler`](super::Handler) signature. It is entered with the instruction
//! pointer already past the opcode word, and consumes its own immediates.

/// Arithmetic operations: ADD, SUB
pub mod arithmetic;

/// Bitwise operations: XOR, ROTL
pub mod bitwise;

/// Comparison operations: CMP
pub mod comparison;

/// Control flow: RET, JUMP_IF_EQUAL
pub mod control;

/// Tamper checks: TIMING_CHECK, CHECKSUM_CHECK, CHECKSUM_PUSH
pub mod integrity;

/// Stack operations: PUSH, POP, PUSH_JUNK
pub mod stack;

/// System operations: CALL_EXTERNAL, MUTATE
pub mod system;
