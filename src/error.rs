//! Error types for uwconfig.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for config operations.
///
/// Format, merge, and dereference errors propagate unchanged up to the
/// binary, which is the only place they are turned into a message and an
/// exit code.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Generic failure reported to the user (I/O, undetectable file type, run
    /// directory conflicts).
    #[error("{0}")]
    UserError(String),

    /// Invalid flag combination, detected before any config I/O.
    #[error("{0}")]
    Argument(String),

    /// Malformed source text.
    #[error("failed to parse {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// Tree shape incompatible with the target format.
    #[error("cannot write {format}: {message}")]
    Serialization { format: String, message: String },

    /// Field table missing required entries.
    #[error("field table schema violation: {0}")]
    Schema(String),

    /// A reference chain revisited a key already being resolved.
    #[error("circular reference: {}", .chain.join(" -> "))]
    CircularReference { chain: Vec<String> },

    /// A reference names a key that exists nowhere in the tree.
    #[error("unresolved reference '{reference}' in '{key}'")]
    UnresolvedReference { key: String, reference: String },
}

impl ConfigError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::UserError(_) => exit_codes::USER_ERROR,
            ConfigError::Argument(_) => exit_codes::ARGUMENT_ERROR,
            ConfigError::Parse { .. }
            | ConfigError::Serialization { .. }
            | ConfigError::Schema(_) => exit_codes::FORMAT_FAILURE,
            ConfigError::CircularReference { .. } | ConfigError::UnresolvedReference { .. } => {
                exit_codes::REFERENCE_FAILURE
            }
        }
    }

    pub(crate) fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub(crate) fn serialization(format: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Serialization {
            format: format.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for uwconfig operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = ConfigError::UserError("missing file".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn argument_error_has_correct_exit_code() {
        let err = ConfigError::Argument("--show-format requires --outfile".to_string());
        assert_eq!(err.exit_code(), exit_codes::ARGUMENT_ERROR);
    }

    #[test]
    fn format_errors_share_exit_code() {
        assert_eq!(
            ConfigError::parse("a.nml", "bad").exit_code(),
            exit_codes::FORMAT_FAILURE
        );
        assert_eq!(
            ConfigError::serialization("INI", "nested").exit_code(),
            exit_codes::FORMAT_FAILURE
        );
        assert_eq!(
            ConfigError::Schema("missing sphum".to_string()).exit_code(),
            exit_codes::FORMAT_FAILURE
        );
    }

    #[test]
    fn reference_errors_share_exit_code() {
        let err = ConfigError::CircularReference {
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.exit_code(), exit_codes::REFERENCE_FAILURE);

        let err = ConfigError::UnresolvedReference {
            key: "salad.fruit".to_string(),
            reference: "missing".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::REFERENCE_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = ConfigError::CircularReference {
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "circular reference: a -> b -> a");

        let err = ConfigError::parse("simple.nml", "unbalanced namelist group 'salad'");
        assert_eq!(
            err.to_string(),
            "failed to parse simple.nml: unbalanced namelist group 'salad'"
        );

        let err = ConfigError::UnresolvedReference {
            key: "salad.fruit".to_string(),
            reference: "missing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unresolved reference 'missing' in 'salad.fruit'"
        );
    }
}
