//! CLI argument parsing for uwconfig.
//!
//! Uses clap derive macros for declarative argument definitions. The
//! set-config arguments are a separate struct so the pipeline and the
//! forecast driver can build them without going through the parser.

use crate::config::FileType;
use crate::error::{ConfigError, Result};
use crate::logging::LogOptions;
use clap::{ArgGroup, Args, Parser};
use std::path::{Path, PathBuf};

/// uwconfig: merge, dereference and convert layered configuration files.
///
/// A base file is read, an optional overlay is merged on top of it,
/// `{{ ... }}` references are resolved, and the result is written in the
/// requested format (YAML, INI, Fortran namelist or FMS field table).
#[derive(Parser, Debug)]
#[command(name = "uwconfig")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("verbosity").args(["verbose", "quiet"])))]
pub struct Cli {
    #[command(flatten)]
    pub set_config: SetConfigArgs,

    /// Print debug messages.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print no messages.
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write log messages to this file.
    #[arg(short, long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Arguments describing one set-config run.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct SetConfigArgs {
    /// Base config file to read.
    #[arg(short, long, value_name = "FILE")]
    pub input_base_file: PathBuf,

    /// Overlay config whose values are merged onto the base.
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Where to write the result. Printed to stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    /// Format of the base file, if its extension does not say.
    #[arg(long, value_enum, value_name = "TYPE")]
    pub input_file_type: Option<FileType>,

    /// Format of the overlay file, if its extension does not say.
    #[arg(long, value_enum, value_name = "TYPE")]
    pub config_file_type: Option<FileType>,

    /// Format to write, if the outfile extension does not say.
    #[arg(long, value_enum, value_name = "TYPE")]
    pub output_file_type: Option<FileType>,

    /// Print the result instead of writing it.
    #[arg(short, long)]
    pub dry_run: bool,

    /// Show differences between the base and overlay files.
    #[arg(long)]
    pub compare: bool,

    /// Print the formatting template for the output file type.
    #[arg(long)]
    pub show_format: bool,

    /// Report which values are complete, templated or empty.
    #[arg(long)]
    pub values_needed: bool,
}

impl SetConfigArgs {
    /// Arguments for a plain run reading `input_base_file`.
    pub fn new(input_base_file: impl Into<PathBuf>) -> Self {
        Self {
            input_base_file: input_base_file.into(),
            config_file: None,
            outfile: None,
            input_file_type: None,
            config_file_type: None,
            output_file_type: None,
            dry_run: false,
            compare: false,
            show_format: false,
            values_needed: false,
        }
    }

    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn with_outfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.outfile = Some(path.into());
        self
    }

    /// Check flag combinations and input paths before any config I/O.
    pub fn validate(&self) -> Result<()> {
        if self.show_format && self.outfile.is_none() {
            return Err(ConfigError::Argument(
                "--show-format requires --outfile to determine the output file type".to_string(),
            ));
        }
        if self.compare && self.config_file.is_none() {
            return Err(ConfigError::Argument(
                "--compare requires --config-file".to_string(),
            ));
        }
        for (flag, file_type) in [
            ("--input-file-type", self.input_file_type),
            ("--config-file-type", self.config_file_type),
        ] {
            if file_type == Some(FileType::FieldTable) {
                return Err(ConfigError::Argument(format!(
                    "{} must be one of YAML, INI or F90",
                    flag
                )));
            }
        }
        require_file("--input-base-file", &self.input_base_file)?;
        if let Some(config_file) = &self.config_file {
            require_file("--config-file", config_file)?;
        }
        Ok(())
    }
}

fn require_file(flag: &str, path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::Argument(format!(
            "{} '{}' does not exist",
            flag,
            path.display()
        )))
    }
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate everything the parser cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.quiet && self.set_config.dry_run {
            return Err(ConfigError::Argument(
                "--quiet cannot be combined with --dry-run".to_string(),
            ));
        }
        self.set_config.validate()
    }

    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            verbose: self.verbose,
            quiet: self.quiet,
            log_file: self.log_file.clone(),
        }
    }
}
