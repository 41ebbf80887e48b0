//! Authentication programs for the Warden VM.
//!
//! An authentication program compares a user supplied key with a key derived from checksums of
//! the program's own code, then calls back into the host with one of two randomly chosen ids.
//! Patching the code changes the derived key and trips the embedded integrity check, so the
//! program cannot be edited into accepting a wrong key.

/// Error types for the auth module
pub mod error;

/// Word-level program builder
pub mod assembler;

mod core;
mod interfaces;

// re-export the public interface
pub use self::core::{
    auth, authenticate,
    ids::CallIds,
    program::{build_auth_program, AuthLayout, AuthProgram, KEY_ROTATION},
    run_auth_program, AuthReport, Verdict, DEFAULT_FAILURE_ID_MASK,
};
pub use error::Error;
pub use interfaces::{AuthArgs, AuthArgsBuilder};
