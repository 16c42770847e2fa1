//! Config file types and file-type detection.

use crate::error::{ConfigError, Result};
use clap::ValueEnum;
use std::fmt;
use std::path::Path;

/// The closed set of supported config formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum FileType {
    #[value(name = "YAML")]
    Yaml,
    /// INI or bash-style `key=value` files.
    #[value(name = "INI")]
    Ini,
    /// Fortran namelist.
    #[value(name = "F90")]
    F90,
    /// FMS field table (written from a YAML description).
    #[value(name = "FieldTable")]
    FieldTable,
}

impl FileType {
    /// Detect a file type from a path's name or extension.
    ///
    /// Returns `None` when the path gives no hint.
    pub fn detect(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        if file_name.starts_with("field_table") {
            return Some(FileType::FieldTable);
        }

        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(FileType::Yaml),
            "ini" | "sh" | "bash" | "cfg" | "conf" => Some(FileType::Ini),
            "nml" | "namelist" => Some(FileType::F90),
            _ => None,
        }
    }

    /// Use an explicit type if given, else detect one from the path.
    pub fn resolve(explicit: Option<FileType>, path: &Path) -> Result<Self> {
        explicit.or_else(|| Self::detect(path)).ok_or_else(|| {
            ConfigError::UserError(format!(
                "cannot determine the file type of '{}'; pass it explicitly with a --*-file-type option",
                path.display()
            ))
        })
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Yaml => "YAML",
            FileType::Ini => "INI",
            FileType::F90 => "F90",
            FileType::FieldTable => "FieldTable",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_by_extension() {
        assert_eq!(
            FileType::detect(Path::new("fruit_config.yaml")),
            Some(FileType::Yaml)
        );
        assert_eq!(FileType::detect(Path::new("a/b.YML")), Some(FileType::Yaml));
        assert_eq!(
            FileType::detect(Path::new("var_defns.sh")),
            Some(FileType::Ini)
        );
        assert_eq!(
            FileType::detect(Path::new("simple.nml")),
            Some(FileType::F90)
        );
        assert_eq!(FileType::detect(Path::new("notes.txt")), None);
        assert_eq!(FileType::detect(Path::new("README")), None);
    }

    #[test]
    fn detects_field_table_by_name() {
        assert_eq!(
            FileType::detect(Path::new("run/field_table.FV3_GFS_v16")),
            Some(FileType::FieldTable)
        );
        assert_eq!(
            FileType::detect(Path::new("field_table")),
            Some(FileType::FieldTable)
        );
    }

    #[test]
    fn explicit_type_wins_over_detection() {
        let path = PathBuf::from("settings.yaml");
        assert_eq!(
            FileType::resolve(Some(FileType::Ini), &path).unwrap(),
            FileType::Ini
        );
        assert_eq!(FileType::resolve(None, &path).unwrap(), FileType::Yaml);
    }

    #[test]
    fn undetectable_type_is_user_error() {
        let err = FileType::resolve(None, Path::new("mystery.dat")).unwrap_err();
        assert!(matches!(err, ConfigError::UserError(_)));
        assert!(err.to_string().contains("mystery.dat"));
    }

    #[test]
    fn display_matches_cli_names() {
        for ty in FileType::value_variants() {
            let parsed = FileType::from_str(&ty.to_string(), false).unwrap();
            assert_eq!(parsed, *ty);
        }
    }
}
