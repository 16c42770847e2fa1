//! Atomic output file replacement.
//!
//! Every config dump is rendered fully in memory before any file is touched,
//! then written through [`atomic_write`]:
//! 1. Write content to a hidden temporary file next to the target
//! 2. Sync the temporary file to disk
//! 3. Rename it over the target
//!
//! A failure at any step leaves an existing target untouched. On a crash a
//! stray `.{filename}.{pid}.tmp` may remain next to the target.

use crate::error::{ConfigError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
///
/// # Example
///
/// ```no_run
/// use uwconfig::fs::atomic_write;
/// use std::path::Path;
///
/// atomic_write(Path::new("out.nml"), b"&salad\n/\n")?;
/// # Ok::<(), uwconfig::error::ConfigError>(())
/// ```
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            ConfigError::UserError(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ConfigError::UserError(format!(
            "failed to replace '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            ConfigError::UserError(format!("invalid output path '{}'", target.display()))
        })?;

    Ok(parent.join(format!(".{}.{}.tmp", filename, std::process::id())))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        ConfigError::UserError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(path);
            ConfigError::UserError(format!(
                "failed to write temporary file '{}': {}",
                path.display(),
                e
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.yaml");

        atomic_write(&file_path, b"fruit: banana\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "fruit: banana\n");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.nml");
        fs::write(&file_path, "&old\n/\n").unwrap();

        atomic_write_file(&file_path, "&new\n/\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "&new\n/\n");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("run").join("INPUT").join("input.nml");

        atomic_write(&file_path, b"&a\n/\n").unwrap();

        assert!(file_path.exists());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.ini");

        atomic_write(&file_path, b"a=1\n").unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("config.ini")]);
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/some/path/field_table")).unwrap();

        assert_eq!(temp.parent().unwrap(), Path::new("/some/path"));
        let name = temp.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".field_table."));
        assert!(name.ends_with(".tmp"));
    }
}
