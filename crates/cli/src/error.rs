#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("{0}")]
    Generic(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] warden_config::error::Error),
    #[error("Program error: {0}")]
    ProgramError(#[from] warden_common::Error),
    #[error("Auth error: {0}")]
    AuthError(#[from] warden_auth::Error),
    #[error("Disassemble error: {0}")]
    DisassembleError(#[from] warden_disassembler::Error),
}
