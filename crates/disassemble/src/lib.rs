//! The Disassembler module converts Warden programs into human-readable assembly.
//!
//! Each instruction is rendered on its own line with its address, mnemonic and immediates.
//! Disassembly is purely static: self-modifying programs are shown as they were loaded.

/// Error types for the disassembler module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use self::core::{disassemble, disassemble_words};
pub use error::Error;
pub use interfaces::{DisassemblerArgs, DisassemblerArgsBuilder};
