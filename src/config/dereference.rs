//! Resolving `{{ key.path }}` placeholders inside a config tree.
//!
//! References are looked up relative to the mapping that holds the value,
//! then each enclosing mapping out to the root; `{{ env.NAME }}` falls back
//! to the environment. Values are visited depth-first in insertion order,
//! and every resolved value is written back, so one pass reaches the fixed
//! point.

use super::model::Config;
use super::value::{Tree, Value, get_path, get_path_mut};
use crate::error::{ConfigError, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{instrument, warn};

/// A plain dotted-path reference such as `{{ salad.fruit }}`.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_\-]*(?:\.[A-Za-z0-9_\-]+)*)\s*\}\}")
        .expect("Invalid reference regex")
});

/// What to do with a reference naming a key that exists nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPolicy {
    /// Keep the placeholder text and log a warning.
    #[default]
    LeaveLiteral,
    /// Fail with [`ConfigError::UnresolvedReference`].
    Fail,
}

impl Config {
    /// Resolve every placeholder against the tree and the process environment,
    /// leaving unresolvable references as literal text.
    pub fn dereference_all(&mut self) -> Result<()> {
        let env: HashMap<String, String> = std::env::vars().collect();
        self.dereference_with(&env, UnresolvedPolicy::LeaveLiteral)
    }

    /// Resolve every placeholder against the tree and an explicit environment.
    #[instrument(level = "debug", skip_all, fields(?policy))]
    pub fn dereference_with(
        &mut self,
        env: &HashMap<String, String>,
        policy: UnresolvedPolicy,
    ) -> Result<()> {
        let mut paths = Vec::new();
        collect_leaf_paths(self.tree(), &mut Vec::new(), &mut paths);

        let mut resolver = Resolver {
            env,
            policy,
            active: Vec::new(),
        };
        for path in &paths {
            resolver.resolve_path(self.tree_mut(), path)?;
        }
        Ok(())
    }
}

/// True if `text` holds a plain dotted-path reference.
pub fn has_reference(text: &str) -> bool {
    REFERENCE.is_match(text)
}

fn collect_leaf_paths(tree: &Tree, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    for (key, value) in tree {
        prefix.push(key.clone());
        match value {
            Value::Map(child) => collect_leaf_paths(child, prefix, out),
            _ => out.push(prefix.clone()),
        }
        prefix.pop();
    }
}

fn contains_reference(value: &Value) -> bool {
    match value {
        Value::String(s) => has_reference(s),
        Value::List(items) => items.iter().any(contains_reference),
        Value::Map(map) => map.values().any(contains_reference),
        _ => false,
    }
}

struct Resolver<'a> {
    env: &'a HashMap<String, String>,
    policy: UnresolvedPolicy,
    /// Keys currently being resolved, outermost first.
    active: Vec<Vec<String>>,
}

impl Resolver<'_> {
    fn resolve_path(&mut self, tree: &mut Tree, path: &[String]) -> Result<()> {
        if self.active.iter().any(|p| p == path) {
            let mut chain: Vec<String> = self.active.iter().map(|p| p.join(".")).collect();
            chain.push(path.join("."));
            return Err(ConfigError::CircularReference { chain });
        }

        let value = match get_path(tree, path) {
            Some(value) if contains_reference(value) => value.clone(),
            _ => return Ok(()),
        };

        self.active.push(path.to_vec());
        let resolved = self.resolve_value(tree, path, value);
        self.active.pop();
        let resolved = resolved?;

        if let Some(slot) = get_path_mut(tree, path) {
            *slot = resolved;
        }
        Ok(())
    }

    fn resolve_value(&mut self, tree: &mut Tree, path: &[String], value: Value) -> Result<Value> {
        match value {
            Value::String(text) => self.resolve_string(tree, path, text),
            Value::List(items) => items
                .into_iter()
                .map(|item| self.resolve_value(tree, path, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Value::Map(map) => {
                for key in map.keys() {
                    let mut child = path.to_vec();
                    child.push(key.clone());
                    self.resolve_path(tree, &child)?;
                }
                Ok(get_path(tree, path).cloned().unwrap_or(Value::Map(map)))
            }
            other => Ok(other),
        }
    }

    /// Substitute references in `text`, then keep substituting in this
    /// value's own scope while the result still holds references that the
    /// referenced key could not resolve in its scope.
    fn resolve_string(&mut self, tree: &mut Tree, path: &[String], text: String) -> Result<Value> {
        let mut seen = HashSet::new();
        let mut current = text;
        loop {
            seen.insert(current.clone());
            match self.substitute(tree, path, &current)? {
                Value::String(next) if has_reference(&next) && !seen.contains(&next) => {
                    current = next;
                }
                resolved => return Ok(resolved),
            }
        }
    }

    fn substitute(&mut self, tree: &mut Tree, path: &[String], text: &str) -> Result<Value> {
        // A value that is exactly one reference takes the referenced value's type.
        if let Some(caps) = REFERENCE.captures(text) {
            let whole = caps.get(0).is_some_and(|m| m.start() == 0 && m.end() == text.len());
            if whole {
                let name = &caps[1];
                return match self.lookup(tree, path, name)? {
                    Some(value) => Ok(value),
                    None => {
                        self.unresolved(path, name)?;
                        Ok(Value::String(text.to_string()))
                    }
                };
            }
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in REFERENCE.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            out.push_str(&text[last..m.start()]);
            match self.lookup(tree, path, &caps[1])? {
                Some(value) if value.is_scalar() => out.push_str(&value.to_string()),
                Some(value) => {
                    warn!(
                        key = %path.join("."),
                        reference = &caps[1],
                        "cannot embed a {} in text; leaving reference in place",
                        value.kind()
                    );
                    out.push_str(m.as_str());
                }
                None => {
                    self.unresolved(path, &caps[1])?;
                    out.push_str(m.as_str());
                }
            }
            last = m.end();
        }
        out.push_str(&text[last..]);
        Ok(Value::String(out))
    }

    /// Find `name` from the scope of `from`, resolving the target first.
    fn lookup(&mut self, tree: &mut Tree, from: &[String], name: &str) -> Result<Option<Value>> {
        let parts: Vec<&str> = name.split('.').collect();
        let scope = &from[..from.len().saturating_sub(1)];

        for depth in (0..=scope.len()).rev() {
            let candidate: Vec<String> = scope[..depth]
                .iter()
                .cloned()
                .chain(parts.iter().map(|p| p.to_string()))
                .collect();
            if get_path(tree, &candidate).is_some() {
                self.resolve_path(tree, &candidate)?;
                return Ok(get_path(tree, &candidate).cloned());
            }
        }

        if let ["env", var] = parts.as_slice()
            && let Some(value) = self.env.get(*var)
        {
            return Ok(Some(Value::String(value.clone())));
        }

        Ok(None)
    }

    fn unresolved(&self, path: &[String], reference: &str) -> Result<()> {
        match self.policy {
            UnresolvedPolicy::Fail => Err(ConfigError::UnresolvedReference {
                key: path.join("."),
                reference: reference.to_string(),
            }),
            UnresolvedPolicy::LeaveLiteral => {
                warn!(key = %path.join("."), reference, "unresolved reference left as text");
                Ok(())
            }
        }
    }
}
