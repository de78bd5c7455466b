use std::collections::HashSet;

use ammonia::{Builder as AmmoniaBuilder, UrlRelative};

/// Sanitiser for literal text runs. Editors occasionally paste inline markup
/// into text nodes; phrasing-level tags survive, everything else is stripped.
pub(crate) fn build_text_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a", "abbr", "b", "br", "cite", "code", "del", "em", "i", "ins", "kbd", "mark", "q", "s",
        "small", "span", "strong", "sub", "sup", "u",
    ]);
    builder.tags(tags);

    let generic: HashSet<&'static str> = HashSet::from(["class", "title", "lang", "dir"]);
    builder.generic_attributes(generic);

    builder.add_tag_attributes("a", &["target"]);
    builder.url_schemes(HashSet::from(["http", "https", "mailto", "tel"]));
    builder.link_rel(Some("noopener noreferrer"));

    builder
}

/// Sanitiser for map embeds: a lone iframe pointing at an absolute http(s)
/// URL.
pub(crate) fn build_embed_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    builder.tags(HashSet::from(["iframe"]));
    builder.generic_attributes(HashSet::from(["title"]));
    builder.add_tag_attributes(
        "iframe",
        &[
            "src",
            "width",
            "height",
            "loading",
            "referrerpolicy",
            "allowfullscreen",
            "frameborder",
        ],
    );
    builder.url_schemes(HashSet::from(["http", "https"]));
    builder.url_relative(UrlRelative::Deny);

    builder
}
