use super::{FormatAdapter, into_mapping};
use crate::error::AdapterError;
use crate::store::ConfigTree;
use serde_json::Value;
use std::path::Path;

/// YAML documents. Not part of [`FormatRegistry::with_defaults`]; register it
/// explicitly to load `.yaml`/`.yml` sources.
///
/// An empty document is an empty mapping.
///
/// [`FormatRegistry::with_defaults`]: super::FormatRegistry::with_defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlAdapter;

impl FormatAdapter for YamlAdapter {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn parse(&self, _path: &Path, content: &str) -> Result<ConfigTree, AdapterError> {
        if content.trim().is_empty() {
            return Ok(ConfigTree::new());
        }
        match serde_yaml::from_str::<Value>(content)? {
            Value::Null => Ok(ConfigTree::new()),
            other => into_mapping(other),
        }
    }
}
