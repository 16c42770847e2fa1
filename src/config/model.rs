//! The `Config` object: a tree bound to the format it was loaded from.

use super::types::FileType;
use super::value::Tree;
use crate::error::{ConfigError, Result};
use crate::formats::adapter;
use crate::fs::atomic_write_file;
use std::path::Path;
use tracing::{debug, info, instrument};

/// An in-memory config tree plus the format it reads from and writes to.
///
/// Each instance is owned by whoever loaded it. Merging borrows the donor
/// config; dumping consumes the config.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    tree: Tree,
    file_type: FileType,
}

impl Config {
    /// An empty config bound to `file_type`.
    pub fn new(file_type: FileType) -> Self {
        Self::from_tree(Tree::new(), file_type)
    }

    pub fn from_tree(tree: Tree, file_type: FileType) -> Self {
        Self { tree, file_type }
    }

    /// Load a config file.
    ///
    /// The format is `file_type` if given, else detected from the path.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Parsed config
    /// * `Err(ConfigError::UserError)` - Unreadable file or undetectable type
    /// * `Err(ConfigError::Parse)` - Malformed content
    #[instrument(level = "debug")]
    pub fn load(path: &Path, file_type: Option<FileType>) -> Result<Self> {
        let file_type = FileType::resolve(file_type, path)?;

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::parse(&content, file_type, &path.display().to_string())?;
        debug!(keys = config.tree.len(), %file_type, "loaded config");
        Ok(config)
    }

    /// Parse config text in a given format.
    pub fn parse(text: &str, file_type: FileType, source_name: &str) -> Result<Self> {
        let tree = adapter(file_type, None).parse(text, source_name)?;
        Ok(Self::from_tree(tree, file_type))
    }

    /// Convenience for `Config::load(path, Some(FileType::Yaml))`.
    pub fn yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(path.as_ref(), Some(FileType::Yaml))
    }

    /// Convenience for `Config::load(path, Some(FileType::F90))`.
    pub fn f90<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(path.as_ref(), Some(FileType::F90))
    }

    /// Convenience for `Config::load(path, Some(FileType::FieldTable))`.
    pub fn field_table<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(path.as_ref(), Some(FileType::FieldTable))
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Render in this config's own format.
    pub fn render(&self) -> Result<String> {
        self.render_as(self.file_type, None)
    }

    /// Render in another format. `target` is the eventual output path, if
    /// any; the field table adapter reads its model name from it.
    pub fn render_as(&self, file_type: FileType, target: Option<&Path>) -> Result<String> {
        adapter(file_type, target).render(&self.tree)
    }

    /// Write this config to `path` in its own format.
    pub fn dump_file<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let file_type = self.file_type;
        self.dump_file_as(path, file_type)
    }

    /// Write this config to `path` in `file_type`.
    ///
    /// The output is rendered completely before the file is touched, so a
    /// rendering failure never creates or truncates `path`.
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display(), %file_type))]
    pub fn dump_file_as<P: AsRef<Path>>(self, path: P, file_type: FileType) -> Result<()> {
        let path = path.as_ref();
        let rendered = self.render_as(file_type, Some(path))?;
        atomic_write_file(path, &rendered)?;
        info!("wrote {} config to {}", file_type, path.display());
        Ok(())
    }
}
