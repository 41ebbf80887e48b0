//! Common utilities used across the Warden codebase.
//!
//! This crate provides shared functionality for the Warden toolkit: reading programs from the
//! command line or disk, and general file and string helpers.

/// Error types for the common crate
pub mod error;

/// Resolving program targets into words.
pub mod program;

/// General utility functions and types for common tasks.
pub mod utils;

pub use error::Error;
