//! Overlaying one config onto another.

use super::model::Config;
use super::value::{Tree, Value};
use tracing::instrument;

impl Config {
    /// Overlay every key of `overlay` onto this config.
    ///
    /// Nested mappings merge key by key; scalars, lists and values whose kind
    /// changes are replaced wholesale. Keys only present here are left
    /// untouched. Applying the same overlay twice is the same as applying it
    /// once.
    #[instrument(level = "debug", skip_all, fields(overlay_keys = overlay.tree().len()))]
    pub fn update_values(&mut self, overlay: &Config) {
        deep_merge(self.tree_mut(), overlay.tree());
    }

    /// [`Config::update_values`] for a bare tree.
    pub fn update_from_tree(&mut self, overlay: &Tree) {
        deep_merge(self.tree_mut(), overlay);
    }
}

/// Merge `overlay` into `base` in place.
///
/// Existing keys keep their position; keys new to `base` are appended in
/// overlay order.
pub fn deep_merge(base: &mut Tree, overlay: &Tree) {
    for (key, incoming) in overlay {
        if let Some(existing) = base.get_mut(key) {
            match (existing, incoming) {
                (Value::Map(existing), Value::Map(incoming)) => deep_merge(existing, incoming),
                (existing, _) => *existing = incoming.clone(),
            }
        } else {
            base.insert(key.clone(), incoming.clone());
        }
    }
}
