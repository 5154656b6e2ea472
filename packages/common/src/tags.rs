//! Element names a container node may render as.

/// Flow and sectioning elements that can hold arbitrary children
pub const CONTAINER_TAGS: &[&str] = &[
    "div",
    "section",
    "article",
    "aside",
    "header",
    "footer",
    "main",
    "nav",
    "figure",
    "figcaption",
    "blockquote",
    "address",
    "details",
    "summary",
    "form",
    "fieldset",
    "ul",
    "ol",
    "li",
    "span",
    "p",
    "a",
    "label",
];

/// Canonical tag for a container, `div` unless the requested tag is allowed
pub fn container_tag(tag: Option<&str>) -> &'static str {
    tag.and_then(|tag| {
        let tag = tag.trim();
        CONTAINER_TAGS
            .iter()
            .copied()
            .find(|allowed| allowed.eq_ignore_ascii_case(tag))
    })
    .unwrap_or("div")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_tags() {
        assert_eq!(container_tag(Some("section")), "section");
        assert_eq!(container_tag(Some("NAV")), "nav");
        assert_eq!(container_tag(None), "div");

        for rejected in [
            "script", "style", "iframe", "plaintext", "textarea", "title", "xmp", "img", "br",
            "input", "html", "body", "",
        ] {
            assert_eq!(container_tag(Some(rejected)), "div", "{} should fall back", rejected);
        }
    }
}
