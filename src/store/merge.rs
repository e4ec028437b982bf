//! Merge strategies for combining a newly loaded mapping with the current tree.
//!
//! The default is a top-level overlay: every key of the incoming mapping
//! replaces the key of the same name in the tree wholesale, nested mappings
//! included. A recursive merge is available as an explicit opt-in.

use super::ConfigTree;
use serde_json::Value;

/// How an incoming mapping is combined with the existing tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Last-loaded source wins per top-level key; nested mappings are not merged.
    #[default]
    Overlay,
    /// Mappings are merged recursively, see [`deep_merge`].
    Deep,
}

impl MergeStrategy {
    /// Apply the incoming mapping on top of `base`.
    pub fn apply(self, base: &mut ConfigTree, incoming: ConfigTree) {
        match self {
            MergeStrategy::Overlay => overlay(base, incoming),
            MergeStrategy::Deep => {
                for (key, incoming_value) in incoming {
                    let merged = match base.remove(&key) {
                        Some(base_value) => deep_merge(base_value, incoming_value),
                        None => incoming_value,
                    };
                    base.insert(key, merged);
                }
            }
        }
    }
}

/// Overlay `incoming` onto `base` key-by-key at the top level.
///
/// `{db: {host: "a", port: 1}}` overlaid with `{db: {host: "b"}}` yields
/// `{db: {host: "b"}}`: the whole `db` entry is replaced and `port` is gone.
pub fn overlay(base: &mut ConfigTree, incoming: ConfigTree) {
    for (key, value) in incoming {
        base.insert(key, value);
    }
}

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans are replaced entirely
/// - If overlay is null, the base value is preserved
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}
