//! YAML adapter backed by serde_yaml.

use super::Format;
use crate::config::{FileType, Tree, Value};
use crate::error::{ConfigError, Result};

const TEMPLATE: &str = "\
# Any YAML mapping is accepted. Nested mappings merge key by key;
# scalars and lists are replaced wholesale. Values may reference
# other keys or environment variables:
section:
  key: value
  other: \"{{ section.key }}-suffix\"
  home: \"{{ env.HOME }}\"
";

/// Reads and writes YAML documents whose root is a mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

impl Format for YamlFormat {
    fn file_type(&self) -> FileType {
        FileType::Yaml
    }

    fn parse(&self, text: &str, source_name: &str) -> Result<Tree> {
        let mut doc: serde_yaml::Value = serde_yaml::from_str(text)
            .map_err(|e| ConfigError::parse(source_name, e.to_string()))?;
        doc.apply_merge()
            .map_err(|e| ConfigError::parse(source_name, e.to_string()))?;

        match convert(doc, source_name)? {
            Value::Null => Ok(Tree::new()),
            Value::Map(tree) => Ok(tree),
            other => Err(ConfigError::parse(
                source_name,
                format!("top level must be a mapping, found a {}", other.kind()),
            )),
        }
    }

    fn render(&self, tree: &Tree) -> Result<String> {
        serde_yaml::to_string(tree).map_err(|e| ConfigError::serialization("YAML", e.to_string()))
    }

    fn template(&self) -> String {
        TEMPLATE.to_string()
    }
}

/// Parse a YAML document into a tree. Shared with the field table adapter.
pub(super) fn parse_yaml(text: &str, source_name: &str) -> Result<Tree> {
    YamlFormat.parse(text, source_name)
}

fn convert(value: serde_yaml::Value, source_name: &str) -> Result<Value> {
    use serde_yaml::Value as Y;

    Ok(match value {
        Y::Null => Value::Null,
        Y::Bool(b) => Value::Bool(b),
        Y::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Y::String(s) => Value::String(s),
        Y::Sequence(items) => Value::List(
            items
                .into_iter()
                .map(|item| convert(item, source_name))
                .collect::<Result<_>>()?,
        ),
        Y::Mapping(mapping) => {
            let mut tree = Tree::with_capacity(mapping.len());
            for (key, value) in mapping {
                let key = mapping_key(key, source_name)?;
                tree.insert(key, convert(value, source_name)?);
            }
            Value::Map(tree)
        }
        Y::Tagged(tagged) => convert(tagged.value, source_name)?,
    })
}

fn mapping_key(key: serde_yaml::Value, source_name: &str) -> Result<String> {
    use serde_yaml::Value as Y;

    match key {
        Y::String(s) => Ok(s),
        Y::Number(n) => Ok(n.to_string()),
        Y::Bool(b) => Ok(b.to_string()),
        other => Err(ConfigError::parse(
            source_name,
            format!("unsupported mapping key {:?}", other),
        )),
    }
}
