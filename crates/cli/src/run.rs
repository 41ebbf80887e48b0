use std::{sync::Arc, time::Duration};

use clap::Parser;
use colored::Colorize;
use tracing::info;
use warden_common::{program::get_program_from_target, utils::strings::parse_word};
use warden_config::Configuration;
use warden_vm::core::{
    clock::MonotonicClock,
    types::Word,
    vm::{ExecutionResult, VM},
};

use crate::error::Error;

/// Arguments for the `run` command
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Runs a program and reports how it halted",
    override_usage = "warden run <TARGET> [OPTIONS]"
)]
pub(crate) struct RunArgs {
    /// The program to run, either a file or a literal word list such as "0,5,3".
    #[clap(required = true)]
    pub(crate) target: String,

    /// Print every executed instruction.
    #[clap(long, short)]
    pub(crate) trace: bool,

    /// Call ids to register. Each logs a line when the program calls it.
    #[clap(long = "external", short = 'e', value_parser = parse_id, allow_hyphen_values = true)]
    pub(crate) externals: Vec<Word>,

    /// Milliseconds the run may take before the timing check reports a debugger.
    #[clap(long = "timing-threshold-ms")]
    pub(crate) timing_threshold_ms: Option<u64>,

    /// Maximum instructions to execute. Zero means unlimited.
    #[clap(long = "step-limit")]
    pub(crate) step_limit: Option<u64>,
}

fn parse_id(value: &str) -> Result<Word, String> {
    parse_word(value).map_err(|e| e.to_string())
}

/// Builds a VM for `args`, falling back to `configuration` for unset limits.
pub(crate) fn build_vm(args: &RunArgs, configuration: &Configuration) -> VM {
    let threshold = args
        .timing_threshold_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| configuration.timing_threshold());
    let mut vm = VM::with_clock(Arc::new(MonotonicClock::new()), threshold)
        .with_step_limit(args.step_limit.unwrap_or(configuration.step_limit));

    for &id in &args.externals {
        vm.register_external_call(id, move || info!("external call {id}"));
    }
    vm
}

/// The `run` command: executes a program and returns its result.
pub(crate) fn run(args: RunArgs, configuration: &Configuration) -> Result<ExecutionResult, Error> {
    let words = get_program_from_target(&args.target)?;
    let mut vm = build_vm(&args, configuration);
    vm.load(&words);

    if !args.trace {
        return Ok(vm.run());
    }

    vm.start();
    while let Some(instruction) = vm.step() {
        println!("{}  {}", instruction, format!("[{}]", vm.stack).dimmed());
    }
    Ok(vm.execution_result())
}

/// Prints a run summary to stdout.
pub(crate) fn print_result(result: &ExecutionResult) {
    let halt = if result.halt.is_normal() {
        result.halt.to_string().green()
    } else {
        result.halt.to_string().red()
    };

    println!("{} {}", "halted:".bold(), halt);
    println!("{} {}", "result:".bold(), result.result);
    println!("{} {} in {:?}", "steps:".bold(), result.steps, result.elapsed);
    if let Some(violation) = &result.violation {
        println!("{} {}", "integrity:".bold(), violation.to_string().red().bold());
    }
}
