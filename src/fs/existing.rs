//! Handling of run directories that already exist.
//!
//! Renames are plain `rename(2)` calls; a run directory is moved aside
//! next to where it lives, so it never crosses a device boundary.

use crate::error::{ConfigError, Result};
use chrono::Local;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// What to do when a run directory already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExistAction {
    /// Remove the old directory.
    #[default]
    Delete,
    /// Move the old directory aside under a timestamped name.
    Rename,
    /// Fail without touching anything.
    Quit,
}

impl FromStr for ExistAction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "delete" => Ok(ExistAction::Delete),
            "rename" => Ok(ExistAction::Rename),
            "quit" => Ok(ExistAction::Quit),
            other => Err(ConfigError::Argument(format!(
                "invalid exist action '{}': expected delete, rename or quit",
                other
            ))),
        }
    }
}

impl fmt::Display for ExistAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExistAction::Delete => "delete",
            ExistAction::Rename => "rename",
            ExistAction::Quit => "quit",
        };
        write!(f, "{}", name)
    }
}

/// The name an existing directory is moved to: `{dir}_{YYYYmmdd_HHMMSS}`.
pub fn renamed_path(dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let mut name = dir.as_os_str().to_os_string();
    name.push(format!("_{}", stamp));
    PathBuf::from(name)
}

/// Clear `dir` out of the way according to `action`.
///
/// Does nothing if `dir` does not exist. Returns the new location when the
/// directory was renamed.
pub fn handle_existing(dir: &Path, action: ExistAction) -> Result<Option<PathBuf>> {
    if !dir.exists() {
        return Ok(None);
    }

    match action {
        ExistAction::Quit => Err(ConfigError::UserError(format!(
            "run directory '{}' already exists",
            dir.display()
        ))),
        ExistAction::Delete => {
            warn!("removing existing directory {}", dir.display());
            fs::remove_dir_all(dir).map_err(|e| {
                ConfigError::UserError(format!(
                    "failed to remove directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
            Ok(None)
        }
        ExistAction::Rename => {
            let destination = renamed_path(dir);
            fs::rename(dir, &destination).map_err(|e| {
                ConfigError::UserError(format!(
                    "failed to move directory '{}' to '{}': {}",
                    dir.display(),
                    destination.display(),
                    e
                ))
            })?;
            info!("moved {} to {}", dir.display(), destination.display());
            Ok(Some(destination))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn exist_action_defaults_to_delete() {
        assert_eq!(ExistAction::default(), ExistAction::Delete);
    }

    #[test]
    fn exist_action_parses_and_displays() {
        for action in [ExistAction::Delete, ExistAction::Rename, ExistAction::Quit] {
            assert_eq!(action.to_string().parse::<ExistAction>().unwrap(), action);
        }
    }

    #[test]
    fn bad_exist_action_is_argument_error() {
        let err = "overwrite".parse::<ExistAction>().unwrap_err();
        assert!(matches!(err, ConfigError::Argument(_)));
    }

    #[test]
    fn renamed_path_appends_timestamp() {
        let renamed = renamed_path(Path::new("/tmp/run"));
        let name = renamed.file_name().unwrap().to_str().unwrap();
        let stamp = name.strip_prefix("run_").unwrap();
        assert_eq!(stamp.len(), "20240131_235959".len());
        assert!(stamp.chars().all(|c| c.is_ascii_digit() || c == '_'));
        assert_eq!(renamed.parent(), Some(Path::new("/tmp")));
    }

    #[test]
    fn missing_directory_is_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("run");
        for action in [ExistAction::Delete, ExistAction::Rename, ExistAction::Quit] {
            assert_eq!(handle_existing(&dir, action).unwrap(), None);
        }
    }

    #[test]
    fn delete_removes_contents() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("run");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("test.txt"), "test file").unwrap();

        handle_existing(&dir, ExistAction::Delete).unwrap();

        assert!(!dir.exists());
    }

    #[test]
    fn rename_keeps_contents() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("run");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("test.txt"), "test file").unwrap();

        let moved = handle_existing(&dir, ExistAction::Rename).unwrap().unwrap();

        assert!(!dir.exists());
        assert_eq!(fs::read_to_string(moved.join("test.txt")).unwrap(), "test file");
    }

    #[test]
    fn quit_fails_and_keeps_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("run");
        fs::create_dir(&dir).unwrap();

        let err = handle_existing(&dir, ExistAction::Quit).unwrap_err();

        assert!(matches!(err, ConfigError::UserError(_)));
        assert!(dir.is_dir());
    }
}
