// src/normalize.rs

//! Raw post cleanup.
//!
//! Tumblr deployments differ in whether posts carry a pre-normalized
//! `summary` field. When they do not, titles and bodies arrive with HTML
//! markup, a small set of named entities, and the occasional embedded link
//! card; this module is the fallback path that turns those into display
//! text.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::RawPost;

/// Named entities Tumblr leaves in text posts.
const ENTITIES: [(&str, &str); 2] = [("&rsquo;", "'"), ("&lsquo;", "'")];

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid pattern"))
}

fn link_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://.*display_url").expect("valid pattern"))
}

fn link_wrapper_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&quot.*url").expect("valid pattern"))
}

/// Remove HTML tag sequences and decode the fixed entity set.
pub fn strip_markup(text: &str) -> String {
    let mut out = tag_pattern().replace_all(text, "").into_owned();
    for (entity, replacement) in ENTITIES {
        out = out.replace(entity, replacement);
    }
    out
}

/// Whether the text is an embedded link card rather than plain prose.
pub fn is_link_only(text: &str) -> bool {
    link_pattern().is_match(text)
}

/// The URL portion of a link card, with the trailing quoting markup trimmed.
pub fn extract_link(text: &str) -> Option<String> {
    let matched = link_pattern().find(text)?;
    Some(
        link_wrapper_pattern()
            .replace(matched.as_str(), "")
            .into_owned(),
    )
}

/// Displayable content for a raw post.
///
/// Prefers the pre-normalized `summary`, then the title, then the body
/// (link-extracted when link-shaped, markup-stripped otherwise). Returns
/// `None` when the post has no usable content; callers must handle that
/// rather than falling through.
pub fn display_text(raw: &RawPost) -> Option<String> {
    if let Some(summary) = non_empty(&raw.summary) {
        return Some(summary.to_string());
    }
    if let Some(title) = non_empty(&raw.title) {
        return Some(strip_markup(title));
    }
    if let Some(body) = non_empty(&raw.body) {
        if is_link_only(body) {
            return extract_link(body);
        }
        return Some(strip_markup(body));
    }
    None
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(summary: Option<&str>, title: Option<&str>, body: Option<&str>) -> RawPost {
        RawPost {
            id: 1,
            date: "2023-04-01 10:00:00 GMT".to_string(),
            summary: summary.map(str::to_string),
            title: title.map(str::to_string),
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn test_strip_markup_tags() {
        assert_eq!(strip_markup("<p>hello <b>world</b></p>"), "hello world");
    }

    #[test]
    fn test_strip_markup_entities() {
        assert_eq!(strip_markup("it&rsquo;s &lsquo;fine"), "it's 'fine");
    }

    #[test]
    fn test_is_link_only() {
        assert!(is_link_only(
            "https://example.com/thing&quot;,&quot;display_url"
        ));
        assert!(!is_link_only("just some text with https://example.com"));
    }

    #[test]
    fn test_extract_link_trims_wrapper() {
        let body = "https://example.com/thing&quot;,&quot;display_url";
        assert_eq!(
            extract_link(body),
            Some("https://example.com/thing".to_string())
        );
    }

    #[test]
    fn display_text_prefers_summary() {
        let post = raw(Some("clean summary"), Some("<b>title</b>"), Some("body"));
        assert_eq!(display_text(&post), Some("clean summary".to_string()));
    }

    #[test]
    fn display_text_falls_back_to_title() {
        let post = raw(None, Some("<i>styled</i> title"), Some("body"));
        assert_eq!(display_text(&post), Some("styled title".to_string()));
    }

    #[test]
    fn display_text_extracts_link_shaped_body() {
        let post = raw(
            None,
            None,
            Some("https://example.com/post&quot;,&quot;display_url"),
        );
        assert_eq!(
            display_text(&post),
            Some("https://example.com/post".to_string())
        );
    }

    #[test]
    fn display_text_strips_plain_body() {
        let post = raw(None, None, Some("<p>plain body</p>"));
        assert_eq!(display_text(&post), Some("plain body".to_string()));
    }

    #[test]
    fn display_text_none_when_post_is_empty() {
        let post = raw(None, Some("   "), None);
        assert_eq!(display_text(&post), None);
    }
}
