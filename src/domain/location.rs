//! Map payloads attached to location entries.
//!
//! Editors paste maps in whatever form the CMS lets them: a bare embed URL, a
//! copied `<iframe>` snippet, an object with one of several keys, or rich text
//! with the snippet buried in a text run.

use serde_json::Value;

use super::blocks::{ContentBlock, InlineNode, ListItem, RichText};

const IFRAME_OPEN: &str = "<iframe";
const IFRAME_CLOSE: &str = "</iframe>";
const HTML_KEYS: [&str; 3] = ["html", "iframe", "embedHtml"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MapPayload {
    #[default]
    None,
    /// An http(s) URL to embed in a frame.
    Embed(String),
    /// Embed markup, usually a single iframe. Not yet sanitised.
    Html(String),
    /// Rich text that may contain iframe snippets inside text runs.
    Rich(RichText),
}

impl MapPayload {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::from_text(text),
            Value::Array(_) => Self::rich(RichText::from_value(value)),
            Value::Object(map) => {
                let embed_url = map
                    .get("url")
                    .and_then(Value::as_str)
                    .filter(|url| is_http_url(url));
                if let Some(url) = embed_url {
                    return MapPayload::Embed(url.trim().to_string());
                }

                let html_like = HTML_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str));
                if let Some(html) = html_like {
                    let markup = first_iframe(html).unwrap_or(html);
                    return MapPayload::Html(markup.to_string());
                }

                if map.contains_key("type") {
                    return Self::rich(RichText::from_value(value));
                }

                MapPayload::None
            }
            _ => MapPayload::None,
        }
    }

    fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return MapPayload::None;
        }
        if is_http_url(trimmed) {
            return MapPayload::Embed(trimmed.to_string());
        }
        match first_iframe(trimmed) {
            Some(iframe) => MapPayload::Html(iframe.to_string()),
            None => MapPayload::Rich(RichText::from_value(&Value::String(trimmed.to_string()))),
        }
    }

    fn rich(rich: RichText) -> Self {
        if rich.is_empty() {
            MapPayload::None
        } else {
            MapPayload::Rich(rich)
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, MapPayload::None)
    }
}

/// Every `<iframe ...>...</iframe>` snippet found in the text runs of `rich`,
/// in document order.
pub fn iframes_in(rich: &RichText) -> Vec<&str> {
    let mut found = Vec::new();
    for block in rich.blocks() {
        match block {
            ContentBlock::Paragraph { children }
            | ContentBlock::Heading { children, .. }
            | ContentBlock::Unknown { children, .. } => collect_iframes(children, &mut found),
            ContentBlock::List { items, .. } => {
                for ListItem { children } in items {
                    collect_iframes(children, &mut found);
                }
            }
            ContentBlock::Code { lines, .. } => {
                found.extend(lines.iter().filter_map(|line| first_iframe(line)));
            }
        }
    }
    found
}

fn collect_iframes<'a>(nodes: &'a [InlineNode], found: &mut Vec<&'a str>) {
    for node in nodes {
        if let Some(iframe) = node.literal_text().and_then(first_iframe) {
            found.push(iframe);
        }
        if let InlineNode::Link { children, .. } | InlineNode::Unknown { children, .. } = node {
            collect_iframes(children, found);
        }
    }
}

/// Locate the first complete iframe element, matching tag names without
/// regard to ASCII case.
pub fn first_iframe(text: &str) -> Option<&str> {
    let lowered = text.to_ascii_lowercase();
    let start = lowered.find(IFRAME_OPEN)?;
    let close = lowered[start..].find(IFRAME_CLOSE)?;
    let end = start + close + IFRAME_CLOSE.len();
    // ASCII lowering preserves byte offsets
    text.get(start..end)
}

pub fn is_http_url(text: &str) -> bool {
    let trimmed = text.trim();
    let lowered = trimmed.get(..8).unwrap_or(trimmed).to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}
