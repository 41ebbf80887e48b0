//! The Warden execution engine.
//!
//! This module provides the [`VM`] struct and its run loop, the opcode dispatch table, and the
//! types a run reports back to the host.

mod core;
mod dispatch;
mod execution;

/// Opcode handlers organized by category.
pub mod handlers;

pub use self::core::VM;
pub use dispatch::{dispatch_key, DispatchTable, Handler};
pub use execution::{ExecutionResult, Halt, Instruction, Status};
