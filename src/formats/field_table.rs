//! FMS field table adapter.
//!
//! Field tables are described in YAML (one mapping per tracer) and written in
//! the ASCII `field_table` layout read by the FMS tracer manager. Which
//! tracers must be present depends on the model configuration, taken from
//! the output file name suffix (`field_table.FV3_GFS_v16`).

use super::Format;
use super::yaml::parse_yaml;
use crate::config::{FileType, Tree, Value};
use crate::error::{ConfigError, Result};
use std::path::Path;

const TEMPLATE: &str = "\
# One top-level key per tracer. longname, units and profile_type are
# required; profile_type.name selects the method and the remaining
# profile_type keys become its control variables.
sphum:
  longname: specific humidity
  units: kg/kg
  profile_type:
    name: fixed
    surface_value: 1.e30
";

const FV3_GFS_V16: &[&str] = &[
    "sphum", "liq_wat", "rainwat", "ice_wat", "snowwat", "graupel", "o3mr", "sgs_tke", "cld_amt",
];

const FV3_GFS_V15P2: &[&str] = &[
    "sphum", "liq_wat", "rainwat", "ice_wat", "snowwat", "graupel", "o3mr", "cld_amt",
];

const REQUIRED_ENTRIES: &[&str] = &["longname", "units", "profile_type"];

/// Tracers a named model configuration requires, if the model is known.
pub fn required_tracers(model: &str) -> Option<&'static [&'static str]> {
    match model {
        "FV3_GFS_v16" => Some(FV3_GFS_V16),
        "FV3_GFS_v15p2" => Some(FV3_GFS_V15P2),
        _ => None,
    }
}

/// Reads field table YAML and writes FMS field tables.
#[derive(Debug, Clone, Default)]
pub struct FieldTableFormat {
    model: Option<String>,
}

impl FieldTableFormat {
    /// Adapter validating against a specific model configuration.
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
        }
    }

    /// Adapter whose model is the suffix of `target`'s file name, if any.
    pub fn for_target(target: Option<&Path>) -> Self {
        let model = target
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .and_then(|n| n.split_once('.'))
            .map(|(_, suffix)| suffix.to_string())
            .filter(|suffix| !suffix.is_empty());
        Self { model }
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn validate(&self, tree: &Tree) -> Result<()> {
        if let Some(required) = self.model().and_then(required_tracers) {
            let missing: Vec<_> = required
                .iter()
                .filter(|tracer| !tree.contains_key(**tracer))
                .copied()
                .collect();
            if !missing.is_empty() {
                return Err(ConfigError::Schema(format!(
                    "{} requires tracers that are not configured: {}",
                    self.model().unwrap_or_default(),
                    missing.join(", ")
                )));
            }
        }

        for (tracer, settings) in tree {
            let Value::Map(settings) = settings else {
                return Err(ConfigError::serialization(
                    "FieldTable",
                    format!(
                        "tracer '{}' is a {}; each tracer must be a mapping",
                        tracer,
                        settings.kind()
                    ),
                ));
            };
            for entry in REQUIRED_ENTRIES {
                if !settings.contains_key(*entry) {
                    return Err(ConfigError::Schema(format!(
                        "tracer '{}' is missing '{}'",
                        tracer, entry
                    )));
                }
            }
            if let Some(Value::Map(profile)) = settings.get("profile_type")
                && !profile.contains_key("name")
            {
                return Err(ConfigError::Schema(format!(
                    "tracer '{}' has a profile_type without a name",
                    tracer
                )));
            }
        }

        Ok(())
    }
}

impl Format for FieldTableFormat {
    fn file_type(&self) -> FileType {
        FileType::FieldTable
    }

    fn parse(&self, text: &str, source_name: &str) -> Result<Tree> {
        parse_yaml(text, source_name)
    }

    fn render(&self, tree: &Tree) -> Result<String> {
        self.validate(tree)?;

        let mut lines = Vec::new();
        for (tracer, settings) in tree {
            let Value::Map(settings) = settings else {
                unreachable!("validate rejects non-mapping tracers");
            };
            lines.push(format!(" \"TRACER\", \"atmos_mod\", \"{}\"", tracer));
            for (key, value) in settings {
                lines.push(render_entry(tracer, key, value)?);
            }
            if let Some(last) = lines.last_mut() {
                last.push_str(" /");
            }
        }

        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        Ok(out)
    }

    fn template(&self) -> String {
        TEMPLATE.to_string()
    }
}

fn render_entry(tracer: &str, key: &str, value: &Value) -> Result<String> {
    match value {
        Value::Map(method) => {
            let name = method.get("name").map(ToString::to_string).unwrap_or_default();
            let mut line = format!("{:7}\"{}\", \"{}\"", "", key, name);
            let controls: Vec<String> = method
                .iter()
                .filter(|(k, _)| k.as_str() != "name")
                .map(|(k, v)| format!("{}={}", k, entry_text(v)))
                .collect();
            if !controls.is_empty() {
                line.push_str(&format!(", \"{}\"", controls.join(", ")));
            }
            Ok(line)
        }
        Value::List(_) => Err(ConfigError::serialization(
            "FieldTable",
            format!("'{}.{}' is a list; field table entries must be scalars or methods", tracer, key),
        )),
        scalar => Ok(format!("{:11}\"{}\", \"{}\"", "", key, entry_text(scalar))),
    }
}

/// Scalar text as FMS expects it; reals keep a mantissa point (`1.e30`).
fn entry_text(value: &Value) -> String {
    match value {
        Value::Float(x) => fortran_real(*x),
        other => other.to_string(),
    }
}

fn fortran_real(x: f64) -> String {
    let text = format!("{:?}", x);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{}.e{}", mantissa, exponent)
        }
        _ => text,
    }
}
