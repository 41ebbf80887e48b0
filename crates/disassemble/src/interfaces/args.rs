use clap::Parser;
use derive_builder::Builder;
use warden_common::{program::get_program_from_target, Error};

/// Arguments for the `disassemble` command
#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Disassembles a Warden program to assembly",
    override_usage = "warden disassemble <TARGET> [OPTIONS]"
)]
pub struct DisassemblerArgs {
    /// The target to disassemble, either a file or a literal word list such as "0,5,3".
    #[clap(required = true)]
    pub target: String,

    /// Whether to use base-10 for the program counter.
    #[clap(long = "decimal-counter", short = 'd')]
    pub decimal_counter: bool,

    /// Name of the output file.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub name: String,

    /// The output directory to write the output to or 'print' to print to the console
    #[clap(long = "output", short = 'o', default_value = "output", hide_default_value = true)]
    pub output: String,
}

impl DisassemblerArgs {
    /// Resolves the target into program words.
    pub fn get_program(&self) -> Result<Vec<i32>, Error> {
        get_program_from_target(&self.target)
    }
}

impl DisassemblerArgsBuilder {
    /// Creates a builder with every field set to its command line default.
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            decimal_counter: Some(false),
            name: Some(String::new()),
            output: Some(String::from("output")),
        }
    }
}
