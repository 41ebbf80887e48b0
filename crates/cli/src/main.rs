pub(crate) mod args;
pub(crate) mod error;
pub(crate) mod log_args;
pub(crate) mod output;
pub(crate) mod run;

use std::io::{self, Write};

use args::{Arguments, Subcommands};
use clap::Parser;
use colored::Colorize;
use error::Error;
use output::{build_output_path, output_filename};
use tracing::{debug, info};

use warden_auth::{auth, Verdict};
use warden_common::utils::{io::file::write_file, strings::parse_word};
use warden_config::{config, Configuration};
use warden_disassembler::disassemble;

/// Reads the authentication key from stdin.
fn prompt_for_key() -> Result<i32, Error> {
    print!("Enter the authentication key: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    parse_word(line.trim()).map_err(|e| Error::Generic(format!("invalid key: {e}")))
}

fn main() -> Result<(), Error> {
    let args = Arguments::parse();

    // setup logging
    let _guard = match args.logs.init_tracing() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialize tracing: {e}");
            None
        }
    };

    let configuration = Configuration::load()
        .map_err(|e| Error::Generic(format!("failed to load configuration: {e}")))?;
    debug!(?configuration, "loaded configuration");

    match args.sub {
        Subcommands::Auth(mut cmd) => {
            // fill unset options from the configuration
            cmd.timing_threshold_ms.get_or_insert(configuration.timing_threshold_ms);
            cmd.step_limit.get_or_insert(configuration.step_limit);
            cmd.failure_id_mask.get_or_insert(configuration.failure_id_mask);

            if cmd.key.is_none() {
                cmd.key = Some(prompt_for_key()?);
            }

            let reveal_key = cmd.reveal_key;
            let report = auth(cmd)?;

            match report.verdict {
                Verdict::Granted => println!("{}", report.verdict.to_string().green().bold()),
                Verdict::Denied => println!("{}", report.verdict.to_string().red()),
                Verdict::Tampered(_) => println!("{}", report.verdict.to_string().red().bold()),
            }
            if reveal_key {
                println!("accepted key: {}", report.accepted_key);
            }
        }

        Subcommands::Run(cmd) => {
            let result = run::run(cmd, &configuration)?;
            run::print_result(&result);
        }

        Subcommands::Disassemble(cmd) => {
            let filename = output_filename(&cmd.name, "disassembled.asm");
            let assembly = disassemble(cmd.clone())?;

            if cmd.output == "print" {
                print!("{assembly}");
            } else {
                let output_path = build_output_path(&cmd.output, &filename)
                    .map_err(|e| Error::Generic(format!("failed to build output path: {e}")))?;

                write_file(&output_path, &assembly)
                    .map_err(|e| Error::Generic(format!("failed to write assembly: {e}")))?;
                info!("wrote disassembly to '{}'", output_path);
            }
        }

        Subcommands::Config(cmd) => {
            config(cmd)?;
        }
    }

    Ok(())
}
