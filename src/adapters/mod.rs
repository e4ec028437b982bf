//! Format adapters: turn the text of one source file into a [`ConfigTree`].
//!
//! Each adapter is registered in a [`FormatRegistry`] under the file
//! extensions it handles. The store resolves the adapter once per `append`
//! from the source's extension (case-insensitive), so new formats are added by
//! registration rather than by editing a dispatch table.
//!
//! Shipped adapters:
//! - [`TomlAdapter`] (`.toml`) - Rust's native configuration language
//! - [`JsonAdapter`] (`.json`)
//! - [`XmlAdapter`] (`.xml`)
//! - [`IniAdapter`] (`.ini`)
//! - [`YamlAdapter`] (`.yaml`, `.yml`) - available, but not registered by default

mod ini;
mod json;
mod toml;
mod xml;
mod yaml;

pub use self::ini::IniAdapter;
pub use self::json::JsonAdapter;
pub use self::toml::TomlAdapter;
pub use self::xml::XmlAdapter;
pub use self::yaml::YamlAdapter;

use crate::error::{AdapterError, ConfigError, ConfigResult};
use crate::store::ConfigTree;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Parser for one configuration file format.
pub trait FormatAdapter: Send + Sync {
    /// Short format name used in logs and error messages (e.g. `"json"`).
    fn name(&self) -> &'static str;

    /// File extensions (without the dot) this adapter handles.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse the full content of `path` into a mapping.
    ///
    /// `path` has already been checked to exist and be readable; `content` is
    /// its text.
    fn parse(&self, path: &Path, content: &str) -> Result<ConfigTree, AdapterError>;
}

/// Maps lowercase file extensions to format adapters.
#[derive(Clone)]
pub struct FormatRegistry {
    adapters: HashMap<String, Arc<dyn FormatAdapter>>,
}

impl FormatRegistry {
    /// A registry with no formats at all.
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// TOML, JSON, XML and INI.
    pub fn with_defaults() -> Self {
        Self::empty()
            .with(TomlAdapter)
            .with(JsonAdapter)
            .with(XmlAdapter)
            .with(IniAdapter)
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<A: FormatAdapter + 'static>(mut self, adapter: A) -> Self {
        self.register(adapter);
        self
    }

    /// Register `adapter` for all of its extensions, replacing any adapter
    /// previously registered for the same extension.
    pub fn register<A: FormatAdapter + 'static>(&mut self, adapter: A) -> &mut Self {
        let adapter: Arc<dyn FormatAdapter> = Arc::new(adapter);
        for extension in adapter.extensions() {
            self.adapters
                .insert(extension.to_ascii_lowercase(), Arc::clone(&adapter));
        }
        self
    }

    /// Look up the adapter for an extension (without the dot).
    pub fn adapter_for(&self, extension: &str) -> Option<Arc<dyn FormatAdapter>> {
        self.adapters.get(&extension.to_ascii_lowercase()).cloned()
    }

    /// Resolve the adapter for `path` from its extension.
    pub fn resolve(&self, path: &Path) -> ConfigResult<Arc<dyn FormatAdapter>> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.adapter_for(&extension)
            .ok_or_else(|| ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            })
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.adapters.contains_key(&extension.to_ascii_lowercase())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

/// Require a parsed document to be a mapping at its root.
pub(crate) fn into_mapping(value: Value) -> Result<ConfigTree, AdapterError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!(
            "document root must be a mapping, found {}",
            kind_name(&other)
        )
        .into()),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
