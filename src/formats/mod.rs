//! Format adapters.
//!
//! Each supported [`FileType`] has one adapter implementing [`Format`]: text
//! is parsed into a [`Tree`] and a tree is rendered back to text. Rendering
//! always produces the complete output in memory; callers write it to disk
//! only after rendering succeeded.

mod field_table;
mod ini;
mod namelist;
mod yaml;

pub use field_table::{FieldTableFormat, required_tracers};
pub use ini::IniFormat;
pub use namelist::NamelistFormat;
pub use yaml::YamlFormat;

use crate::config::{FileType, Tree};
use crate::error::Result;
use std::path::Path;

/// Bidirectional conversion between a config tree and one text encoding.
pub trait Format {
    /// The file type this adapter reads and writes.
    fn file_type(&self) -> FileType;

    /// Parse source text. `source_name` is only used in error messages.
    fn parse(&self, text: &str, source_name: &str) -> Result<Tree>;

    /// Render a tree, failing if its shape cannot be expressed.
    fn render(&self, tree: &Tree) -> Result<String>;

    /// The formatting template printed by `--show-format`.
    fn template(&self) -> String;
}

/// Build the adapter for a file type.
///
/// `target` is the file being read or written, if any; the field table
/// adapter takes its model name from the file name suffix.
pub fn adapter(file_type: FileType, target: Option<&Path>) -> Box<dyn Format> {
    match file_type {
        FileType::Yaml => Box::new(YamlFormat),
        FileType::Ini => Box::new(IniFormat),
        FileType::F90 => Box::new(NamelistFormat),
        FileType::FieldTable => Box::new(FieldTableFormat::for_target(target)),
    }
}
