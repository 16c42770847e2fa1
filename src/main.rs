//! Entry point for the `uwconfig` CLI.
//!
//! Parses and validates arguments, installs logging, runs the set-config
//! pipeline against stdout, and maps errors to exit codes.

use std::process::ExitCode;
use uwconfig::cli::Cli;
use uwconfig::error::ConfigError;
use uwconfig::{exit_codes, logging, pipeline};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(&cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(cli: &Cli) -> Result<(), ConfigError> {
    // Nothing is read or written until the flags make sense.
    cli.validate()?;

    let _guard = logging::init(&cli.log_options())?;

    let stdout = std::io::stdout();
    pipeline::create_config_obj(&cli.set_config, &mut stdout.lock())
}
