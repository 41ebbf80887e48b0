use clap::{Parser, Subcommand};

use warden_auth::AuthArgs;
use warden_config::ConfigArgs;
use warden_disassembler::DisassemblerArgs;

use crate::{log_args::LogArgs, run::RunArgs};

#[derive(Debug, Parser)]
#[clap(name = "warden", version)]
pub(crate) struct Arguments {
    #[clap(subcommand)]
    pub(crate) sub: Subcommands,

    #[clap(flatten)]
    pub(crate) logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(
    about = "Warden runs self-checking bytecode on a tamper-evident stack VM.",
    after_help = "Programs are word lists: decimal or 0x hex, separated by whitespace or commas."
)]
pub(crate) enum Subcommands {
    #[clap(name = "auth", about = "Check a key against a freshly built self-checking program")]
    Auth(AuthArgs),

    #[clap(name = "run", about = "Run a program and report how it halted")]
    Run(RunArgs),

    #[clap(name = "disassemble", about = "Disassemble a program to assembly")]
    Disassemble(DisassemblerArgs),

    #[clap(name = "config", about = "Display and edit the current configuration")]
    Config(ConfigArgs),
}
