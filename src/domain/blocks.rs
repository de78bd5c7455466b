//! Rich-text model for the block documents served by the content backend.
//!
//! The backend hands out loosely shaped JSON: every node is an object with a
//! `type` string, optional `children`, and kind-specific fields. Normalisation
//! turns that into closed enums with deterministic defaults so renderers never
//! have to second-guess the payload. Unknown kinds are kept (with whatever
//! children they carry) rather than discarded.

use serde::Deserialize;
use serde_json::Value;

const DEFAULT_HEADING_LEVEL: u8 = 3;

/// Marker style for list blocks. Absent or unrecognised formats are unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFormat {
    Ordered,
    #[default]
    Unordered,
}

impl ListFormat {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("ordered") => ListFormat::Ordered,
            _ => ListFormat::Unordered,
        }
    }
}

/// Heading size in the range 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Clamp an arbitrary numeric level into 1..=6.
    pub fn clamped(raw: i64) -> Self {
        // clamp keeps the value inside u8 range
        Self(raw.clamp(1, 6) as u8)
    }

    /// Read a level from a raw payload field. Numbers (and numeric strings) are
    /// clamped; anything else falls back to level 3.
    pub fn from_value(value: Option<&Value>) -> Self {
        let numeric = match value {
            Some(Value::Number(number)) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|float| float.trunc() as i64)),
            Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
            _ => None,
        };

        numeric.map_or_else(Self::default, Self::clamped)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        Self(DEFAULT_HEADING_LEVEL)
    }
}

/// Formatting marks carried by text runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMarks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
}

impl TextMarks {
    fn from_value(value: &Value) -> Self {
        Self {
            bold: bool_field(value, "bold"),
            italic: bool_field(value, "italic"),
            underline: bool_field(value, "underline"),
            strikethrough: bool_field(value, "strikethrough"),
            code: bool_field(value, "code"),
        }
    }
}

/// One run of inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// Literal text that may itself contain raw markup.
    Text { text: String, marks: TextMarks },
    /// Hyperlink; `children` carry the visible label.
    Link {
        url: String,
        children: Vec<InlineNode>,
    },
    /// Inline code span, always treated as literal text.
    Code { text: String },
    /// Anything the renderer does not recognise.
    Unknown {
        kind: String,
        text: Option<String>,
        children: Vec<InlineNode>,
    },
}

impl InlineNode {
    pub fn text(text: impl Into<String>) -> Self {
        InlineNode::Text {
            text: text.into(),
            marks: TextMarks::default(),
        }
    }

    pub fn link(url: impl Into<String>, children: Vec<InlineNode>) -> Self {
        InlineNode::Link {
            url: url.into(),
            children,
        }
    }

    pub fn from_value(value: &Value) -> Self {
        match node_kind(value) {
            "text" => InlineNode::Text {
                text: str_field(value, "text").unwrap_or_default().to_string(),
                marks: TextMarks::from_value(value),
            },
            "link" | "a" => InlineNode::Link {
                url: str_field(value, "url").unwrap_or("#").to_string(),
                children: inline_children(value),
            },
            "code" => InlineNode::Code {
                text: str_field(value, "text").unwrap_or_default().to_string(),
            },
            other => InlineNode::Unknown {
                kind: other.to_string(),
                text: str_field(value, "text").map(str::to_string),
                children: inline_children(value),
            },
        }
    }

    /// The literal `text` payload of this node, when it carries one.
    pub fn literal_text(&self) -> Option<&str> {
        match self {
            InlineNode::Text { text, .. } | InlineNode::Code { text } => Some(text),
            InlineNode::Unknown { text, .. } => text.as_deref(),
            InlineNode::Link { .. } => None,
        }
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(text) = self.literal_text() {
            out.push(text);
        }
        match self {
            InlineNode::Link { children, .. } | InlineNode::Unknown { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            InlineNode::Text { .. } | InlineNode::Code { .. } => {}
        }
    }
}

/// One entry of a list block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItem {
    pub children: Vec<InlineNode>,
}

impl ListItem {
    pub fn new(children: Vec<InlineNode>) -> Self {
        Self { children }
    }

    pub fn from_value(value: &Value) -> Self {
        Self {
            children: inline_children(value),
        }
    }
}

/// One structural unit of formatted content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum ContentBlock {
    Paragraph {
        children: Vec<InlineNode>,
    },
    List {
        format: ListFormat,
        items: Vec<ListItem>,
    },
    Heading {
        level: HeadingLevel,
        children: Vec<InlineNode>,
    },
    Code {
        language: Option<String>,
        lines: Vec<String>,
    },
    Unknown {
        kind: String,
        children: Vec<InlineNode>,
    },
}

impl ContentBlock {
    pub fn paragraph(children: Vec<InlineNode>) -> Self {
        ContentBlock::Paragraph { children }
    }

    pub fn from_value(value: &Value) -> Self {
        match node_kind(value) {
            "paragraph" => ContentBlock::Paragraph {
                children: inline_children(value),
            },
            "list" => ContentBlock::List {
                format: ListFormat::parse(str_field(value, "format")),
                items: child_values(value).iter().map(ListItem::from_value).collect(),
            },
            "heading" => ContentBlock::Heading {
                level: HeadingLevel::from_value(value.get("level")),
                children: inline_children(value),
            },
            "code" => ContentBlock::Code {
                language: str_field(value, "language")
                    .map(str::trim)
                    .filter(|language| !language.is_empty())
                    .map(str::to_string),
                lines: child_values(value)
                    .iter()
                    .map(|line| str_field(line, "text").unwrap_or_default().to_string())
                    .collect(),
            },
            other => ContentBlock::Unknown {
                kind: other.to_string(),
                children: inline_children(value),
            },
        }
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            ContentBlock::Paragraph { children }
            | ContentBlock::Heading { children, .. }
            | ContentBlock::Unknown { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            ContentBlock::List { items, .. } => {
                for child in items.iter().flat_map(|item| item.children.iter()) {
                    child.collect_text(out);
                }
            }
            ContentBlock::Code { lines, .. } => {
                for line in lines {
                    out.push(line);
                }
            }
        }
    }
}

impl From<Value> for ContentBlock {
    fn from(value: Value) -> Self {
        ContentBlock::from_value(&value)
    }
}

/// An ordered sequence of blocks, as stored in description-like fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Value")]
pub struct RichText {
    blocks: Vec<ContentBlock>,
}

impl RichText {
    pub fn new(blocks: Vec<ContentBlock>) -> Self {
        Self { blocks }
    }

    /// Normalise any of the shapes a rich field arrives in: an array of
    /// blocks, a single block object, a bare string, or nothing at all.
    pub fn from_value(value: &Value) -> Self {
        let blocks = match value {
            Value::Array(items) => items.iter().map(ContentBlock::from_value).collect(),
            Value::Object(_) => vec![ContentBlock::from_value(value)],
            Value::String(text) if !text.is_empty() => {
                vec![ContentBlock::paragraph(vec![InlineNode::text(text.as_str())])]
            }
            _ => Vec::new(),
        };
        Self { blocks }
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every literal text payload in document order, joined by single spaces.
    pub fn plain_text(&self) -> String {
        plain_text(&self.blocks)
    }
}

impl From<Value> for RichText {
    fn from(value: Value) -> Self {
        RichText::from_value(&value)
    }
}

/// Collect the text of a block sequence, ignoring structure and formatting.
/// Every text run counts, empty ones included, so an empty run still adds a
/// separating space.
pub fn plain_text(blocks: &[ContentBlock]) -> String {
    let mut parts = Vec::new();
    for block in blocks {
        block.collect_text(&mut parts);
    }
    parts.join(" ")
}

fn node_kind(value: &Value) -> &str {
    str_field(value, "type").unwrap_or_default()
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn bool_field(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn child_values(value: &Value) -> &[Value] {
    value
        .get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn inline_children(value: &Value) -> Vec<InlineNode> {
    child_values(value)
        .iter()
        .map(InlineNode::from_value)
        .collect()
}
