//! The set-config pipeline: load, merge, dereference, then report or write.

use crate::cli::SetConfigArgs;
use crate::config::{Config, FileType};
use crate::error::{ConfigError, Result};
use crate::formats::adapter;
use std::io::Write;
use tracing::{debug, info, instrument};

/// What a run produces. Exactly one mode is active per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Print the formatting template for the output file type.
    ShowFormat,
    /// Print the differences between base and overlay.
    Compare,
    /// Print which values are complete, templated or empty.
    ValuesNeeded,
    /// Print the result instead of writing it.
    DryRun,
    /// Write the result to the outfile.
    Write,
}

impl OutputMode {
    /// Select the mode from the flags. Earlier flags win.
    pub fn select(args: &SetConfigArgs) -> Self {
        if args.show_format {
            OutputMode::ShowFormat
        } else if args.compare {
            OutputMode::Compare
        } else if args.values_needed {
            OutputMode::ValuesNeeded
        } else if args.dry_run || args.outfile.is_none() {
            OutputMode::DryRun
        } else {
            OutputMode::Write
        }
    }
}

/// Run one set-config invocation, printing any report to `out`.
///
/// `args` should already have passed [`SetConfigArgs::validate`].
#[instrument(level = "debug", skip(out))]
pub fn create_config_obj<W: Write>(args: &SetConfigArgs, out: &mut W) -> Result<()> {
    let mode = OutputMode::select(args);
    debug!(?mode, "selected output mode");

    if mode == OutputMode::ShowFormat {
        let file_type = output_type(args, None)?;
        let template = adapter(file_type, args.outfile.as_deref()).template();
        return emit(out, &template);
    }

    let mut config = Config::load(&args.input_base_file, args.input_file_type)?;

    let overlay = match &args.config_file {
        Some(path) => Some(Config::load(path, args.config_file_type)?),
        None => None,
    };

    if mode == OutputMode::Compare {
        let Some(overlay) = overlay else {
            return Err(ConfigError::Argument(
                "--compare requires --config-file".to_string(),
            ));
        };
        let diffs = config.compare(&overlay);
        info!(
            "comparing {} against {}",
            args.input_base_file.display(),
            args.config_file
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
        if diffs.is_empty() {
            return emit(out, "No differences found.\n");
        }
        let text: String = diffs.iter().map(|d| format!("{}\n", d)).collect();
        return emit(out, &text);
    }

    if let Some(overlay) = &overlay {
        config.update_values(overlay);
    }
    config.dereference_all()?;

    match mode {
        OutputMode::ValuesNeeded => emit(out, &config.values_needed().to_string()),
        OutputMode::DryRun => {
            let file_type = output_type(args, Some(config.file_type()))?;
            let rendered = config.render_as(file_type, args.outfile.as_deref())?;
            emit(out, &rendered)
        }
        OutputMode::Write => {
            let file_type = output_type(args, Some(config.file_type()))?;
            match &args.outfile {
                Some(path) => config.dump_file_as(path, file_type),
                None => Err(ConfigError::Argument("no outfile to write".to_string())),
            }
        }
        OutputMode::ShowFormat | OutputMode::Compare => Ok(()),
    }
}

/// The output format: explicit, else from the outfile name, else `fallback`.
fn output_type(args: &SetConfigArgs, fallback: Option<FileType>) -> Result<FileType> {
    args.output_file_type
        .or_else(|| args.outfile.as_deref().and_then(FileType::detect))
        .or(fallback)
        .ok_or_else(|| {
            ConfigError::UserError(
                "cannot determine the output file type; pass --output-file-type".to_string(),
            )
        })
}

fn emit<W: Write>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| ConfigError::UserError(format!("failed to write output: {}", e)))
}
