use crate::domain::{
    blocks::{ContentBlock, InlineNode, RichText},
    location::MapPayload,
};

/// Markup that has already passed through one of the renderer's sanitisers.
/// Only the render service can construct it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedHtml(String);

impl SanitizedHtml {
    pub(crate) fn new(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

const VOID_TAGS: [&str; 3] = ["br", "hr", "img"];

/// An HTML element with a fixed tag name. Void tags never emit children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

/// Displayable output of the renderer. Pages embed these in their own layout,
/// either as a tree or serialised through [`Node::to_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Literal text; escaped on output.
    Text(String),
    /// Pre-sanitised markup; emitted verbatim.
    Trusted(SanitizedHtml),
    Fragment(Vec<Node>),
}

impl Node {
    pub fn element(tag: &'static str, children: Vec<Node>) -> Self {
        Node::Element(Element {
            tag,
            attributes: Vec::new(),
            children,
        })
    }

    pub fn element_with(
        tag: &'static str,
        attributes: Vec<(&'static str, String)>,
        children: Vec<Node>,
    ) -> Self {
        Node::Element(Element {
            tag,
            attributes,
            children,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn empty() -> Self {
        Node::Fragment(Vec::new())
    }

    /// True when the node produces no output at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Element(_) => false,
            Node::Text(text) => text.is_empty(),
            Node::Trusted(html) => html.is_empty(),
            Node::Fragment(children) => children.iter().all(Node::is_empty),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(element) => {
                out.push('<');
                out.push_str(element.tag);
                for (name, value) in &element.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(out, value, true);
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&element.tag) {
                    return;
                }
                for child in &element.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(element.tag);
                out.push('>');
            }
            Node::Text(text) => escape_into(out, text, false),
            Node::Trusted(html) => out.push_str(html.as_str()),
            Node::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
        }
    }
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\'' if attribute => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

/// Rendering interface for rich content. Implementations are pure apart from
/// sanitisation: the same input always yields the same node.
pub trait RenderService: Send + Sync {
    fn render_block(&self, block: &ContentBlock) -> Node;

    fn render_inline(&self, node: &InlineNode) -> Node;

    fn render_map(&self, payload: &MapPayload) -> Node;

    fn render_blocks(&self, blocks: &[ContentBlock]) -> Node {
        Node::Fragment(blocks.iter().map(|block| self.render_block(block)).collect())
    }

    fn render_rich_text(&self, rich: &RichText) -> Node {
        self.render_blocks(rich.blocks())
    }
}
