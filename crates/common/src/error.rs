//! Error types for the common crate

/// Errors raised while resolving or parsing programs
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic error with a message
    #[error("Error: {0}")]
    Generic(String),

    /// A word list could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// An error occurred while accessing the filesystem
    #[error("Filesystem error: {0}")]
    FilesystemError(#[from] std::io::Error),
}
