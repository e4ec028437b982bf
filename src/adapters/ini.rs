use super::FormatAdapter;
use crate::error::AdapterError;
use crate::store::ConfigTree;
use serde_json::Value;
use std::path::Path;

/// INI files.
///
/// Keys before the first section header stay at the top level; each
/// `[section]` becomes a mapping one level deep. Values are kept as strings.
/// `name[] = value` lines collect into a sequence under `name`.
///
/// Backslashes in values are kept as written, and a `;` or `#` preceded by
/// whitespace starts a comment that runs to the end of the line.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniAdapter;

impl FormatAdapter for IniAdapter {
    fn name(&self) -> &'static str {
        "ini"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ini"]
    }

    fn parse(&self, _path: &Path, content: &str) -> Result<ConfigTree, AdapterError> {
        let options = ::ini::ParseOption {
            enabled_escape: false,
            ..Default::default()
        };
        let ini = ::ini::Ini::load_from_str_opt(content, options)?;
        let mut tree = ConfigTree::new();

        for (section, properties) in ini.iter() {
            match section {
                None => collect_properties(&mut tree, properties),
                Some(name) => {
                    let entry = tree
                        .entry(name.to_string())
                        .or_insert_with(|| Value::Object(ConfigTree::new()));
                    if !entry.is_object() {
                        *entry = Value::Object(ConfigTree::new());
                    }
                    if let Value::Object(section_map) = entry {
                        collect_properties(section_map, properties);
                    }
                }
            }
        }

        Ok(tree)
    }
}

fn collect_properties(target: &mut ConfigTree, properties: &::ini::Properties) {
    for (key, value) in properties.iter() {
        let value = Value::String(value.to_string());
        match key.strip_suffix("[]") {
            Some(name) => {
                let entry = target
                    .entry(name.trim_end().to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                match entry {
                    Value::Array(items) => items.push(value),
                    other => *other = Value::Array(vec![value]),
                }
            }
            None => {
                target.insert(key.to_string(), value);
            }
        }
    }
}
