//! INI and bash-style `key=value` adapter.
//!
//! Parsing is delegated to rust-ini with quote and escape handling turned
//! off, so values keep their raw text (`VAR="a b"` stays quoted) and render
//! back unchanged. Sectionless keys become top-level scalars; each section
//! becomes a top-level mapping of strings.

use super::Format;
use crate::config::{FileType, Tree, Value};
use crate::error::{ConfigError, Result};
use ini::{Ini, ParseOption};

const TEMPLATE: &str = "\
# Sectionless keys first (bash sourceable), then one block per section.
# Values are plain text; lists and nested sections are not supported.
key=value
other_key={{ key }}

[section]
key=value
";

/// Reads and writes INI and bash-style config files.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniFormat;

impl Format for IniFormat {
    fn file_type(&self) -> FileType {
        FileType::Ini
    }

    fn parse(&self, text: &str, source_name: &str) -> Result<Tree> {
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, opt)
            .map_err(|e| ConfigError::parse(source_name, e.to_string()))?;

        let mut tree = Tree::new();
        for (section, props) in ini.iter() {
            match section {
                None => {
                    for (key, value) in props.iter() {
                        if matches!(tree.get(key), Some(Value::Map(_))) {
                            return Err(conflict(source_name, key));
                        }
                        tree.insert(key.to_string(), Value::String(value.to_string()));
                    }
                }
                Some(name) => {
                    let entry = tree
                        .entry(name.to_string())
                        .or_insert_with(|| Value::Map(Tree::new()));
                    let Value::Map(section_tree) = entry else {
                        return Err(conflict(source_name, name));
                    };
                    for (key, value) in props.iter() {
                        section_tree.insert(key.to_string(), Value::String(value.to_string()));
                    }
                }
            }
        }

        Ok(tree)
    }

    fn render(&self, tree: &Tree) -> Result<String> {
        let mut out = String::new();
        let mut seen_section = false;

        for (key, value) in tree {
            match value {
                Value::Map(section) => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(&format!("[{}]\n", key));
                    for (sub_key, sub_value) in section {
                        let text = scalar_text(sub_value, &format!("{}.{}", key, sub_key))?;
                        out.push_str(&format!("{}={}\n", sub_key, text));
                    }
                    seen_section = true;
                }
                _ if seen_section => {
                    return Err(ConfigError::serialization(
                        "INI",
                        format!(
                            "sectionless key '{}' follows a section; it would be read back as part of that section",
                            key
                        ),
                    ));
                }
                _ => {
                    let text = scalar_text(value, key)?;
                    out.push_str(&format!("{}={}\n", key, text));
                }
            }
        }

        Ok(out)
    }

    fn template(&self) -> String {
        TEMPLATE.to_string()
    }
}

fn scalar_text(value: &Value, path: &str) -> Result<String> {
    match value {
        Value::List(_) | Value::Map(_) => Err(ConfigError::serialization(
            "INI",
            format!("'{}' is a {}; INI values must be scalars", path, value.kind()),
        )),
        Value::Bool(b) => Ok(if *b { "True" } else { "False" }.to_string()),
        scalar => Ok(scalar.to_string()),
    }
}

fn conflict(source_name: &str, name: &str) -> ConfigError {
    ConfigError::parse(
        source_name,
        format!(
            "'{}' is used both as a key and as a section (conflicting types)",
            name
        ),
    )
}
