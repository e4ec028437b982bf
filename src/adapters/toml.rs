use super::FormatAdapter;
use crate::error::AdapterError;
use crate::store::ConfigTree;
use serde_json::{Number, Value};
use std::path::Path;

/// TOML documents, the native configuration language of the Rust ecosystem.
///
/// Datetimes become their RFC 3339 string form. Non-finite floats have no JSON
/// number representation and are kept as strings (`"inf"`, `"nan"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlAdapter;

impl FormatAdapter for TomlAdapter {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }

    fn parse(&self, _path: &Path, content: &str) -> Result<ConfigTree, AdapterError> {
        let table: ::toml::Table = content.parse()?;
        Ok(table
            .into_iter()
            .map(|(key, value)| (key, toml_to_json(value)))
            .collect())
    }
}

fn toml_to_json(value: ::toml::Value) -> Value {
    match value {
        ::toml::Value::String(s) => Value::String(s),
        ::toml::Value::Integer(i) => Value::from(i),
        ::toml::Value::Float(f) => Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        ::toml::Value::Boolean(b) => Value::Bool(b),
        ::toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        ::toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        ::toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}
