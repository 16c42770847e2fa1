//! Log output setup.
//!
//! The subscriber is installed as the thread's scoped default rather than the
//! global one, so the returned guard decides how long it stays active and
//! library callers (and tests) can install their own.

use crate::error::{ConfigError, Result};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// How log output should be produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Log at DEBUG instead of INFO.
    pub verbose: bool,
    /// Suppress console output entirely.
    pub quiet: bool,
    /// Also write logs to this file.
    pub log_file: Option<PathBuf>,
}

impl LogOptions {
    fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        }
    }
}

/// Install a subscriber for `options` as the current thread's default.
///
/// Logs go to stderr unless `quiet`; stdout is left for program output.
/// `RUST_LOG` overrides the level when set.
pub fn init(options: &LogOptions) -> Result<DefaultGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(options.level().into())
        .from_env_lossy();

    let console = (!options.quiet).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    let file = match &options.log_file {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::UserError(format!(
                        "failed to create log directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
            let handle = File::create(path).map_err(|e| {
                ConfigError::UserError(format!(
                    "failed to open log file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(handle))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file);

    Ok(tracing::subscriber::set_default(subscriber))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_level_is_info() {
        assert_eq!(LogOptions::default().level(), LevelFilter::INFO);
    }

    #[test]
    fn verbose_level_is_debug() {
        let options = LogOptions {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(options.level(), LevelFilter::DEBUG);
    }

    #[test]
    fn log_file_receives_events() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("logs").join("run.log");
        let options = LogOptions {
            quiet: true,
            log_file: Some(log_path.clone()),
            ..Default::default()
        };

        {
            let _guard = init(&options).unwrap();
            tracing::info!("wrote namelist");
        }

        let text = std::fs::read_to_string(&log_path).unwrap();
        assert!(text.contains("wrote namelist"));
        assert!(!text.contains("\x1b["), "log file should not contain ANSI codes");
    }

    #[test]
    fn unwritable_log_file_is_user_error() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened as a log file.
        let options = LogOptions {
            log_file: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };

        let err = init(&options).unwrap_err();
        assert!(matches!(err, ConfigError::UserError(_)));
    }
}
