use super::{FormatAdapter, into_mapping};
use crate::error::AdapterError;
use crate::store::ConfigTree;
use serde_json::Value;
use std::path::Path;

/// JSON documents. The root must be an object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAdapter;

impl FormatAdapter for JsonAdapter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn parse(&self, _path: &Path, content: &str) -> Result<ConfigTree, AdapterError> {
        let value: Value = serde_json::from_str(content)?;
        into_mapping(value)
    }
}
