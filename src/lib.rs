//! uwconfig: layered configuration files for scientific workflows.
//!
//! Reads YAML, INI/bash, and Fortran namelist files into an ordered tree,
//! merges overrides onto a base, resolves `{{ ... }}` references, and writes
//! the result in any supported format, including FMS field tables.

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod exit_codes;
pub mod formats;
pub mod fs;
pub mod logging;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, FileType, Tree, Value};
pub use error::{ConfigError, Result};
