use url::{ParseError, Url};

const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];
const FALLBACK_HREF: &str = "#";

/// Pass through link targets with a safe scheme (or none at all); anything
/// else collapses to `#`.
pub fn safe_href(url: &str) -> &str {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return FALLBACK_HREF;
    }
    if trimmed.starts_with(['#', '/', '?', '.']) {
        return trimmed;
    }

    match Url::parse(trimmed) {
        Ok(parsed) if ALLOWED_SCHEMES.contains(&parsed.scheme()) => trimmed,
        Ok(_) => FALLBACK_HREF,
        Err(ParseError::RelativeUrlWithoutBase) => trimmed,
        Err(_) => FALLBACK_HREF,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_schemes_and_relative_targets_pass_through() {
        assert_eq!(safe_href("https://x.test"), "https://x.test");
        assert_eq!(safe_href(" mailto:info@x.test "), "mailto:info@x.test");
        assert_eq!(safe_href("tel:+81-3-0000-0000"), "tel:+81-3-0000-0000");
        assert_eq!(safe_href("/event/abc"), "/event/abc");
        assert_eq!(safe_href("#top"), "#top");
        assert_eq!(safe_href("contact"), "contact");
    }

    #[test]
    fn other_schemes_collapse_to_fragment() {
        assert_eq!(safe_href("javascript:alert(1)"), "#");
        assert_eq!(safe_href("JavaScript:alert(1)"), "#");
        assert_eq!(safe_href("data:text/html,hi"), "#");
        assert_eq!(safe_href(""), "#");
    }
}
