/// Environment variable utilities.
pub mod env;

/// Input/output utilities for file manipulation.
pub mod io;

/// Word list parsing and formatting utilities.
pub mod strings;
