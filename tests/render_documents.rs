use chrono_tz::Tz;
use edgesite::application::render::{RenderService, render_service};
use edgesite::domain::blocks::RichText;
use edgesite::domain::documents::{ContentDocument, ContentKind};
use edgesite::presentation::views::document_article;
use serde_json::{Value, json};

fn render(value: Value) -> String {
    render_service()
        .render_rich_text(&RichText::from_value(&value))
        .to_html()
}

#[test]
fn event_payload_renders_full_article() {
    let payload = json!({
        "documentId": "ev-2024-spring",
        "Title": "Spring Seminar",
        "Date": "2024-03-31T15:30:00Z",
        "Visible": true,
        "Description": [
            {"type": "heading", "level": 2, "children": [{"type": "text", "text": "Agenda"}]},
            {"type": "list", "format": "ordered", "children": [
                {"type": "list-item", "children": [{"type": "text", "text": "Keynote", "bold": true}]},
                {"type": "list-item", "children": [{"type": "text", "text": "Q&A"}]}
            ]},
            {"type": "paragraph", "children": [
                {"type": "text", "text": "Details at "},
                {"type": "link", "url": "https://example.test/seminar", "children": [{"type": "text", "text": "our site"}]},
                {"type": "text", "text": "."}
            ]}
        ]
    });

    let document = ContentDocument::from_value(ContentKind::Event, &payload).expect("event object");
    let html = document_article(render_service().as_ref(), &document, Tz::Asia__Tokyo).to_html();

    insta::assert_snapshot!(html, @r#"<article data-kind="event"><h1>Spring Seminar</h1><time datetime="2024-03-31T15:30:00Z">2024/4/1</time><div class="description"><h2>Agenda</h2><ol><li><strong>Keynote</strong></li><li>Q&amp;A</li></ol><p>Details at <a href="https://example.test/seminar" target="_blank" rel="noopener noreferrer">our site</a>.</p></div></article>"#);
}

#[test]
fn hostile_markup_is_neutralised() {
    let html = render(json!([
        {"type": "paragraph", "children": [
            {"type": "text", "text": "<script>alert(1)</script><b onclick=\"x()\">bold</b>"},
            {"type": "a", "url": "javascript:alert(2)", "children": [{"type": "text", "text": "<i>click</i>"}]}
        ]}
    ]));

    insta::assert_snapshot!(html, @r##"<p><b>bold</b><a href="#" target="_blank" rel="noopener noreferrer">&lt;i&gt;click&lt;/i&gt;</a></p>"##);
}

#[test]
fn legacy_and_unknown_shapes_degrade() {
    let html = render(json!([
        {"type": "quote", "children": [{"type": "text", "text": "hello"}]},
        {"type": "list", "children": [{"type": "list-item", "children": [{"type": "mystery", "text": "kept"}]}]},
        {"type": "heading", "level": 9, "children": [{"type": "code", "text": "<tag>"}]},
        {"type": "code", "language": "rust", "children": [{"type": "text", "text": "let x = 1 < 2;"}]}
    ]));

    insta::assert_snapshot!(html, @r#"<p>hello</p><ul><li>kept</li></ul><h6><code>&lt;tag&gt;</code></h6><pre data-language="rust"><code>let x = 1 &lt; 2;</code></pre>"#);
}

#[test]
fn plain_string_descriptions_become_paragraphs() {
    assert_eq!(render(json!("Just text")), "<p>Just text</p>");
    assert_eq!(render(Value::Null), "");
    assert_eq!(render(json!([])), "");
}
