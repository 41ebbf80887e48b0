use warden_vm::core::types::Word;

/// Error type for the auth module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No key was supplied
    #[error("no authentication key was supplied")]
    MissingKey,

    /// The failure id mask would make the success and failure ids equal
    #[error("invalid failure id mask {0:#x}: the mask must be non-zero")]
    InvalidMask(Word),

    /// An assembler patch pointed past the end of the program
    #[error("cannot patch address {address} of a {length} word program")]
    PatchOutOfBounds {
        /// The address that was patched
        address: usize,
        /// The program length at the time
        length: usize,
    },

    /// Generic internal error
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
