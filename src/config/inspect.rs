//! Read-only views over a config: key-wise comparison and the report of
//! which values still need to be filled in.

use super::model::Config;
use super::value::{Tree, Value};
use std::fmt;

/// One key-level difference between two trees, addressed by dotted path.
#[derive(Debug, Clone, PartialEq)]
pub enum Difference {
    /// Present only in the base.
    Removed { path: String, value: Value },
    /// Present only in the other tree.
    Added { path: String, value: Value },
    /// Present in both with different values.
    Changed { path: String, old: Value, new: Value },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::Removed { path, value } => write!(f, "- {}: {}", path, value),
            Difference::Added { path, value } => write!(f, "+ {}: {}", path, value),
            Difference::Changed { path, old, new } => write!(f, "~ {}: {} -> {}", path, old, new),
        }
    }
}

impl Config {
    /// Differences from this config to `other`, base keys first in tree order.
    pub fn compare(&self, other: &Config) -> Vec<Difference> {
        let mut out = Vec::new();
        diff_trees(self.tree(), other.tree(), "", &mut out);
        out
    }

    /// Classify every leaf value as complete, templated, or empty.
    pub fn values_needed(&self) -> ValuesReport {
        let mut report = ValuesReport::default();
        classify(self.tree(), "", &mut report);
        report
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn diff_trees(base: &Tree, other: &Tree, prefix: &str, out: &mut Vec<Difference>) {
    for (key, old) in base {
        let path = join(prefix, key);
        match (old, other.get(key)) {
            (Value::Map(old), Some(Value::Map(new))) => diff_trees(old, new, &path, out),
            (old, Some(new)) if old != new => out.push(Difference::Changed {
                path,
                old: old.clone(),
                new: new.clone(),
            }),
            (_, Some(_)) => {}
            (old, None) => out.push(Difference::Removed {
                path,
                value: old.clone(),
            }),
        }
    }
    for (key, new) in other {
        if !base.contains_key(key) {
            out.push(Difference::Added {
                path: join(prefix, key),
                value: new.clone(),
            });
        }
    }
}

/// Output of `--values-needed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuesReport {
    pub complete: Vec<String>,
    /// Paths whose value still contains `{{ ... }}`, with the raw value.
    pub templated: Vec<(String, String)>,
    pub empty: Vec<String>,
}

impl ValuesReport {
    pub fn is_complete(&self) -> bool {
        self.templated.is_empty() && self.empty.is_empty()
    }
}

impl fmt::Display for ValuesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Keys that are complete:")?;
        for path in &self.complete {
            writeln!(f, "    {}", path)?;
        }
        writeln!(f)?;
        writeln!(f, "Keys that have unfilled templates:")?;
        for (path, raw) in &self.templated {
            writeln!(f, "    {}: {}", path, raw)?;
        }
        writeln!(f)?;
        writeln!(f, "Keys that are set to empty:")?;
        for path in &self.empty {
            writeln!(f, "    {}", path)?;
        }
        Ok(())
    }
}

fn classify(tree: &Tree, prefix: &str, report: &mut ValuesReport) {
    for (key, value) in tree {
        let path = join(prefix, key);
        match value {
            Value::Map(child) if child.is_empty() => report.empty.push(path),
            Value::Map(child) => classify(child, &path, report),
            value if is_templated(value) => report.templated.push((path, value.to_string())),
            Value::Null => report.empty.push(path),
            Value::String(s) if s.is_empty() => report.empty.push(path),
            Value::List(items) if items.is_empty() => report.empty.push(path),
            _ => report.complete.push(path),
        }
    }
}

fn is_templated(value: &Value) -> bool {
    match value {
        Value::String(s) => s.contains("{{"),
        Value::List(items) => items.iter().any(is_templated),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileType;

    fn yaml(text: &str) -> Config {
        Config::parse(text, FileType::Yaml, "test.yaml").unwrap()
    }

    #[test]
    fn compare_reports_removed_added_and_changed() {
        let base = yaml("salad:\n  base: kale\n  fruit: banana\n  vegetable: tomato\nsize: 1\n");
        let other = yaml("salad:\n  base: kale\n  fruit: orange\n  dressing: ranch\nsize: 1\n");

        let diffs = base.compare(&other);
        let lines: Vec<_> = diffs.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "~ salad.fruit: banana -> orange",
                "- salad.vegetable: tomato",
                "+ salad.dressing: ranch",
            ]
        );
    }

    #[test]
    fn compare_of_identical_configs_is_empty() {
        let a = yaml("a: [1, 2]\nb:\n  c: true\n");
        assert!(a.compare(&a.clone()).is_empty());
    }

    #[test]
    fn compare_kind_change_is_single_change() {
        let a = yaml("a:\n  b: 1\n");
        let b = yaml("a: 1\n");
        assert_eq!(
            a.compare(&b),
            vec![Difference::Changed {
                path: "a".into(),
                old: Value::Map(a.tree()["a"].as_map().unwrap().clone()),
                new: Value::Integer(1),
            }]
        );
    }

    #[test]
    fn values_needed_classifies_leaves() {
        let config = yaml(
            "salad:\n  base: kale\n  dressing: \"{{ dressing }}\"\n  toppings: ~\n  extras: \"\"\n  sides: []\nempty: {}\ncount: 3\n",
        );
        let report = config.values_needed();
        assert_eq!(report.complete, vec!["salad.base", "count"]);
        assert_eq!(
            report.templated,
            vec![("salad.dressing".to_string(), "{{ dressing }}".to_string())]
        );
        assert_eq!(
            report.empty,
            vec!["salad.toppings", "salad.extras", "salad.sides", "empty"]
        );
        assert!(!report.is_complete());
    }

    #[test]
    fn values_report_display_has_three_sections() {
        let report = yaml("a: 1\nb: \"{{ x }}\"\nc: ~\n").values_needed();
        assert_eq!(
            report.to_string(),
            "Keys that are complete:\n    a\n\nKeys that have unfilled templates:\n    b: {{ x }}\n\nKeys that are set to empty:\n    c\n"
        );
    }
}
