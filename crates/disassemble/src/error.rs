/// Error type for the Disassembler module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target could not be resolved to a program
    #[error("Target error: {0}")]
    Target(#[from] warden_common::Error),

    /// Generic internal error that may occur during disassembly
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
