//! Cell renderers dispatched by a column's `type` tag.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::source::Row;

/// Tag of the thousands-grouped number renderer.
pub const COUNTER: &str = "counter";
/// Tag of the hyperlink renderer.
pub const HAIPERLINK: &str = "haiperlink";

// =============================================================================
// CellContent
// =============================================================================

/// Renderer output, independent of any UI toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// Nothing to show.
    Empty,
    /// Plain text.
    Text(String),
    /// A formatted count.
    Counter(String),
    /// A hyperlink. `defended` marks rows whose `info.defended` is true.
    Link {
        href: String,
        label: String,
        defended: bool,
    },
    /// A selection checkbox.
    Checkbox { checked: bool, indeterminate: bool },
}

impl CellContent {
    /// Text a plain-text surface would print for this content.
    pub fn plain_text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(text) | CellContent::Counter(text) => text.clone(),
            CellContent::Link { label, .. } => label.clone(),
            CellContent::Checkbox {
                checked,
                indeterminate,
            } => match (checked, indeterminate) {
                (_, true) => "[-]".to_string(),
                (true, false) => "[x]".to_string(),
                (false, false) => "[ ]".to_string(),
            },
        }
    }
}

/// Text form of a scalar cell value.
///
/// Null, missing, objects and arrays have no text form.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// =============================================================================
// Renderers
// =============================================================================

/// Function turning a cell value into content. The whole row is passed along
/// for renderers that look at sibling fields.
pub type CellRenderFn = Arc<dyn Fn(Option<&Value>, &Row) -> CellContent + Send + Sync>;

/// Render the raw value.
pub fn render_plain(value: Option<&Value>, _row: &Row) -> CellContent {
    plain(value)
}

fn plain(value: Option<&Value>) -> CellContent {
    match value {
        None | Some(Value::Null) => CellContent::Empty,
        Some(v) => match value_to_text(v) {
            Some(text) => CellContent::Text(text),
            None => CellContent::Text(v.to_string()),
        },
    }
}

/// Render an integer with thousands separators.
pub fn render_counter(value: Option<&Value>, _row: &Row) -> CellContent {
    let number = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match number {
        Some(n) => CellContent::Counter(group_thousands(n)),
        None => plain(value),
    }
}

/// Link target for a url. Anything not starting with `http` gets `http://`.
pub fn link_href(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// Render a URL, or a `{url|href, label|text}` object, as a link.
///
/// The label is the value as given. The row's `info.defended` flag is carried
/// on the link.
pub fn render_link(value: Option<&Value>, row: &Row) -> CellContent {
    let defended = row
        .value("info.defended")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    match value {
        Some(Value::String(url)) if !url.is_empty() => CellContent::Link {
            href: link_href(url),
            label: url.clone(),
            defended,
        },
        Some(Value::Object(map)) => {
            let href = map
                .get("url")
                .or_else(|| map.get("href"))
                .and_then(Value::as_str);
            let label = map
                .get("label")
                .or_else(|| map.get("text"))
                .and_then(Value::as_str);
            match href {
                Some(href) => CellContent::Link {
                    href: link_href(href),
                    label: label.unwrap_or(href).to_string(),
                    defended,
                },
                None => plain(value),
            }
        }
        _ => plain(value),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// RendererRegistry
// =============================================================================

/// Maps a column `type` tag to its renderer.
///
/// Columns without a tag, or with a tag nobody registered, render the raw
/// value.
#[derive(Clone)]
pub struct RendererRegistry {
    renderers: HashMap<String, CellRenderFn>,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(COUNTER, render_counter);
        registry.register(HAIPERLINK, render_link);
        registry
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&String> = self.renderers.keys().collect();
        tags.sort();
        f.debug_struct("RendererRegistry").field("tags", &tags).finish()
    }
}

impl RendererRegistry {
    /// Registry with the built-in renderers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with no tagged renderers.
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Register (or replace) the renderer for a tag.
    pub fn register<F>(&mut self, tag: impl Into<String>, render: F)
    where
        F: Fn(Option<&Value>, &Row) -> CellContent + Send + Sync + 'static,
    {
        self.renderers.insert(tag.into(), Arc::new(render));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, tag: impl Into<String>, render: F) -> Self
    where
        F: Fn(Option<&Value>, &Row) -> CellContent + Send + Sync + 'static,
    {
        self.register(tag, render);
        self
    }

    /// Whether a renderer exists for the tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.renderers.contains_key(tag)
    }

    /// Renderer for a tag, falling back to [`render_plain`].
    pub fn resolve(&self, tag: Option<&str>) -> CellRenderFn {
        match tag {
            None => Arc::new(render_plain),
            Some(tag) => match self.renderers.get(tag) {
                Some(render) => Arc::clone(render),
                None => {
                    log::debug!("No renderer for cell type '{}', rendering raw value", tag);
                    Arc::new(render_plain)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::source::build_rows;

    #[test]
    fn test_link_href_prefixes_bare_hosts() {
        assert_eq!(link_href("example.com/t/1"), "http://example.com/t/1");
        assert_eq!(link_href("https://example.com"), "https://example.com");
        assert_eq!(link_href("http://example.com"), "http://example.com");
    }

    #[test]
    fn test_render_link_reads_defended_from_row() {
        let rows = build_rows(
            vec![
                json!({ "url": "example.com", "info": { "defended": true } }),
                json!({ "url": "example.com" }),
            ],
            None,
        );
        let link = |row: &Row| render_link(row.value("url"), row);
        assert_eq!(
            link(&rows[0]),
            CellContent::Link {
                href: "http://example.com".to_string(),
                label: "example.com".to_string(),
                defended: true,
            }
        );
        assert!(matches!(link(&rows[1]), CellContent::Link { defended: false, .. }));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
    }
}
