//! Plain views over fetched documents for the operator binary.

use chrono_tz::Tz;

use crate::application::render::{Node, RenderService, safe_href};
use crate::application::search::SearchOutcome;
use crate::domain::documents::{ContentDocument, ContentKind};
use crate::util::timezone::{display_date, machine_datetime};

pub const UNTITLED: &str = "(untitled)";
pub const UNAVAILABLE_NOTICE: &str = "Content is temporarily unavailable.";

/// Build an `<article>` for one document: title, date, service link, image,
/// description and, for locations, the map.
pub fn document_article(renderer: &dyn RenderService, document: &ContentDocument, tz: Tz) -> Node {
    let mut children = vec![Node::element(
        "h1",
        vec![Node::text(document.display_title(UNTITLED))],
    )];

    if let Some(date) = document.date {
        children.push(Node::element_with(
            "time",
            vec![("datetime", machine_datetime(date))],
            vec![Node::text(display_date(date, tz))],
        ));
    }

    if let Some(url) = document.url.as_deref() {
        children.push(Node::element_with(
            "p",
            vec![("class", "service-link".to_string())],
            vec![Node::element_with(
                "a",
                vec![
                    ("href", safe_href(url).to_string()),
                    ("target", "_blank".to_string()),
                    ("rel", "noopener noreferrer".to_string()),
                ],
                vec![Node::text(url)],
            )],
        ));
    }

    if let Some(src) = document.image_url.as_deref() {
        children.push(Node::element_with(
            "img",
            vec![
                ("src", safe_href(src).to_string()),
                ("alt", document.display_title(UNTITLED).to_string()),
                ("loading", "lazy".to_string()),
            ],
            Vec::new(),
        ));
    }

    if !document.description.is_empty() {
        children.push(Node::element_with(
            "div",
            vec![("class", "description".to_string())],
            vec![renderer.render_rich_text(&document.description)],
        ));
    }

    let map = renderer.render_map(&document.map);
    if !map.is_empty() {
        children.push(map);
    }

    Node::element_with(
        "article",
        vec![("data-kind", document.kind.as_str().to_string())],
        children,
    )
}

/// One tab-separated line: identifier, display date (events only), title.
pub fn summary_line(document: &ContentDocument, tz: Tz) -> String {
    let id = document.public_id().unwrap_or("-");
    let title = document.display_title(UNTITLED);
    match (document.kind, document.date) {
        (ContentKind::Event, Some(date)) => format!("{id}\t{}\t{title}", display_date(date, tz)),
        (ContentKind::Event, None) => format!("{id}\t-\t{title}"),
        _ => format!("{id}\t{title}"),
    }
}

/// Human-readable search report: hit count, then title, identifier and snippet
/// per hit.
pub fn search_report(outcome: &SearchOutcome) -> String {
    if outcome.is_blank() {
        return "Enter a search term.\n".to_string();
    }

    let mut out = format!("{} result(s) for \"{}\"\n", outcome.hits.len(), outcome.query.trim());
    for hit in &outcome.hits {
        out.push_str(&format!(
            "\n{} [{}]\n  {}\n",
            hit.document.display_title(UNTITLED),
            hit.document.public_id().unwrap_or("-"),
            hit.snippet
        ));
    }
    out
}
