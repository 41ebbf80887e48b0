use clap::Parser;
use derive_builder::Builder;
use warden_common::utils::strings::parse_word;
use warden_vm::core::types::Word;

/// Arguments for the `auth` command
#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Checks a key against a freshly built self-checking program",
    override_usage = "warden auth [OPTIONS]"
)]
pub struct AuthArgs {
    /// The key to authenticate, in decimal or 0x hex. Prompted for when omitted.
    #[clap(long, short, value_parser = parse_key, allow_hyphen_values = true)]
    pub key: Option<Word>,

    /// Milliseconds the run may take before the timing check reports a debugger.
    #[clap(long = "timing-threshold-ms")]
    pub timing_threshold_ms: Option<u64>,

    /// Maximum instructions to execute. Zero means unlimited.
    #[clap(long = "step-limit")]
    pub step_limit: Option<u64>,

    /// Mask deriving the failure call id from the success call id.
    #[clap(long = "failure-id-mask", value_parser = parse_key)]
    pub failure_id_mask: Option<Word>,

    /// Print the key the program accepts after the run.
    #[clap(long = "reveal-key")]
    pub reveal_key: bool,
}

fn parse_key(value: &str) -> Result<Word, String> {
    parse_word(value.trim()).map_err(|e| e.to_string())
}

impl AuthArgsBuilder {
    /// Creates a builder with every field set to its command line default.
    pub fn new() -> Self {
        Self {
            key: Some(None),
            timing_threshold_ms: Some(None),
            step_limit: Some(None),
            failure_id_mask: Some(None),
            reveal_key: Some(false),
        }
    }
}
