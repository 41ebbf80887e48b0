//! Warden virtual machine implementation
//!
//! This crate provides the stack-based bytecode interpreter at the heart of Warden, including the
//! program store, operand stack, opcode dispatch, and the integrity primitives (timing probe and
//! checksum opcodes) that halt execution once tampering is detected.

/// Core VM implementation, including the program store, stack, opcodes and integrity state
pub mod core;

/// Error types for the VM
pub mod error;

pub use error::Error;
