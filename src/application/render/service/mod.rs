mod config;
mod links;
mod map;

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::application::render::types::{Node, RenderService, SanitizedHtml};
use crate::domain::{
    blocks::{ContentBlock, HeadingLevel, InlineNode, ListFormat, ListItem, TextMarks},
    location::MapPayload,
};

use config::{build_embed_sanitizer, build_text_sanitizer};

pub use links::safe_href;

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Default renderer for backend rich text, with Ammonia sanitisation of text
/// runs and map embeds.
pub struct RichTextRenderService {
    text_sanitizer: ammonia::Builder<'static>,
    embed_sanitizer: ammonia::Builder<'static>,
}

impl RichTextRenderService {
    fn new() -> Self {
        Self {
            text_sanitizer: build_text_sanitizer(),
            embed_sanitizer: build_embed_sanitizer(),
        }
    }

    /// Clean a raw text payload against the inline allowlist. Applying this to
    /// its own output returns the same string.
    pub fn sanitize_text(&self, raw: &str) -> SanitizedHtml {
        SanitizedHtml::new(self.text_sanitizer.clean(raw).to_string())
    }

    pub(crate) fn sanitize_embed(&self, raw: &str) -> SanitizedHtml {
        SanitizedHtml::new(self.embed_sanitizer.clean(raw).to_string())
    }

    fn render_children(&self, children: &[InlineNode]) -> Vec<Node> {
        children.iter().map(|child| self.render_inline(child)).collect()
    }

    fn render_paragraph(&self, children: &[InlineNode]) -> Node {
        Node::element("p", self.render_children(children))
    }

    fn render_list(&self, format: ListFormat, items: &[ListItem]) -> Node {
        let tag = match format {
            ListFormat::Ordered => "ol",
            ListFormat::Unordered => "ul",
        };
        let entries = items
            .iter()
            .map(|item| Node::element("li", self.render_children(&item.children)))
            .collect();
        Node::element(tag, entries)
    }

    fn render_heading(&self, level: HeadingLevel, children: &[InlineNode]) -> Node {
        let index = usize::from(level.get().clamp(1, 6)) - 1;
        Node::element(HEADING_TAGS[index], self.render_children(children))
    }

    fn render_code_block(&self, language: Option<&str>, lines: &[String]) -> Node {
        let attributes = language
            .map(|language| vec![("data-language", language.to_string())])
            .unwrap_or_default();
        let code = Node::element("code", vec![Node::text(lines.join("\n"))]);
        Node::element_with("pre", attributes, vec![code])
    }

    fn render_text(&self, text: &str, marks: TextMarks) -> Node {
        let mut node = if marks.code {
            Node::element("code", vec![Node::text(text)])
        } else {
            Node::Trusted(self.sanitize_text(text))
        };

        for (enabled, tag) in [
            (marks.strikethrough, "s"),
            (marks.underline, "u"),
            (marks.italic, "em"),
            (marks.bold, "strong"),
        ] {
            if enabled {
                node = Node::element(tag, vec![node]);
            }
        }
        node
    }

    fn render_link(&self, url: &str, children: &[InlineNode]) -> Node {
        let label = children
            .first()
            .and_then(InlineNode::literal_text)
            .unwrap_or(url);
        Node::element_with(
            "a",
            vec![
                ("href", safe_href(url).to_string()),
                ("target", "_blank".to_string()),
                ("rel", "noopener noreferrer".to_string()),
            ],
            vec![Node::text(label)],
        )
    }
}

impl Default for RichTextRenderService {
    fn default() -> Self {
        Self::new()
    }
}

static RENDER_SERVICE: Lazy<Arc<RichTextRenderService>> =
    Lazy::new(|| Arc::new(RichTextRenderService::new()));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<RichTextRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl RenderService for RichTextRenderService {
    fn render_block(&self, block: &ContentBlock) -> Node {
        match block {
            ContentBlock::Paragraph { children } => self.render_paragraph(children),
            ContentBlock::List { format, items } => self.render_list(*format, items),
            ContentBlock::Heading { level, children } => self.render_heading(*level, children),
            ContentBlock::Code { language, lines } => {
                self.render_code_block(language.as_deref(), lines)
            }
            // unrecognised blocks still show their inline content
            ContentBlock::Unknown { children, .. } => self.render_paragraph(children),
        }
    }

    fn render_inline(&self, node: &InlineNode) -> Node {
        match node {
            InlineNode::Text { text, marks } => self.render_text(text, *marks),
            InlineNode::Link { url, children } => self.render_link(url, children),
            InlineNode::Code { text } => Node::element("code", vec![Node::text(text.as_str())]),
            InlineNode::Unknown { text, .. } => text
                .as_deref()
                .map_or_else(Node::empty, Node::text),
        }
    }

    fn render_map(&self, payload: &MapPayload) -> Node {
        map::render_map(self, payload)
    }
}
