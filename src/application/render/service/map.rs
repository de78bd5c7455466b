use crate::application::render::types::{Node, RenderService};
use crate::domain::location::{MapPayload, iframes_in};

use super::RichTextRenderService;

const MAP_CLASS: &str = "map-embed";

pub(super) fn render_map(service: &RichTextRenderService, payload: &MapPayload) -> Node {
    let children = match payload {
        MapPayload::None => return Node::empty(),
        MapPayload::Embed(url) => vec![embed_frame(url)],
        MapPayload::Html(markup) => vec![Node::Trusted(service.sanitize_embed(markup))],
        MapPayload::Rich(rich) => {
            let frames = iframes_in(rich);
            if frames.is_empty() {
                vec![service.render_rich_text(rich)]
            } else {
                frames
                    .into_iter()
                    .map(|frame| Node::Trusted(service.sanitize_embed(frame)))
                    .collect()
            }
        }
    };

    Node::element_with("div", vec![("class", MAP_CLASS.to_string())], children)
}

fn embed_frame(url: &str) -> Node {
    Node::element_with(
        "iframe",
        vec![
            ("src", url.to_string()),
            ("title", "map".to_string()),
            ("loading", "lazy".to_string()),
            ("referrerpolicy", "no-referrer-when-downgrade".to_string()),
            ("allowfullscreen", String::new()),
        ],
        Vec::new(),
    )
}
