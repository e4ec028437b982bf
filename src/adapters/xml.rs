use super::FormatAdapter;
use crate::error::AdapterError;
use crate::store::ConfigTree;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::Value;
use std::path::Path;

/// Key under which an element's text is kept when the element also has
/// attributes or child elements.
pub const TEXT_KEY: &str = "#text";

/// XML documents.
///
/// The root element's name is dropped; its attributes and children become the
/// top-level mapping. Attributes and child elements share one namespace, so
/// `<db host="a"/>` and `<db><host>a</host></db>` produce the same mapping.
/// Repeated sibling elements become a sequence, text-only elements become
/// strings and empty elements become empty strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlAdapter;

impl FormatAdapter for XmlAdapter {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["xml"]
    }

    fn parse(&self, _path: &Path, content: &str) -> Result<ConfigTree, AdapterError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<ConfigTree> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    ensure_single_root(&root)?;
                    stack.push(Element::open(&start)?);
                }
                Ok(Event::Empty(start)) => {
                    ensure_single_root(&root)?;
                    let element = Element::open(&start)?;
                    close(element, &mut stack, &mut root);
                }
                Ok(Event::End(_)) => {
                    // quick-xml checks that end names match their start tags
                    if let Some(element) = stack.pop() {
                        close(element, &mut stack, &mut root);
                    }
                }
                Ok(Event::Text(text)) => {
                    let text = text
                        .unescape()
                        .map_err(|e| format!("invalid text at byte {}: {e}", reader.buffer_position()))?;
                    if let Some(element) = stack.last_mut() {
                        element.text.push_str(&text);
                    }
                }
                Ok(Event::CData(data)) => {
                    if let Some(element) = stack.last_mut() {
                        element.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(
                        format!("malformed XML at byte {}: {e}", reader.error_position()).into(),
                    );
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(format!("unexpected end of document inside <{}>", open.name).into());
        }
        root.ok_or_else(|| "document has no root element".into())
    }
}

struct Element {
    name: String,
    children: ConfigTree,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, AdapterError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut children = ConfigTree::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| format!("bad attribute on <{name}>: {e}"))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| format!("bad attribute value on <{name}>: {e}"))?;
            children.insert(key, Value::String(value.into_owned()));
        }
        Ok(Self {
            name,
            children,
            text: String::new(),
        })
    }

    fn into_value(self) -> Value {
        let text = self.text.trim();
        if self.children.is_empty() {
            return Value::String(text.to_string());
        }
        let mut children = self.children;
        if !text.is_empty() {
            children.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
        }
        Value::Object(children)
    }
}

fn ensure_single_root(root: &Option<ConfigTree>) -> Result<(), AdapterError> {
    if root.is_some() {
        return Err("document has more than one root element".into());
    }
    Ok(())
}

/// Attach a finished element to its parent, or make it the document root.
fn close(element: Element, stack: &mut [Element], root: &mut Option<ConfigTree>) {
    let Some(parent) = stack.last_mut() else {
        let Element { children, text, .. } = element;
        let mut tree = children;
        let text = text.trim();
        if !text.is_empty() {
            tree.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
        }
        *root = Some(tree);
        return;
    };

    let name = element.name.clone();
    let value = element.into_value();
    match parent.children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.children.insert(name, value);
        }
    }
}
