//! Text cleanup utilities
//!
//! Helpers for normalizing run and cell text before it is compared or
//! reported.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|ftp://|mailto:|www\.)[^\s"<>\]]+"#)
        .expect("URL pattern is valid")
});

// HYPERLINK "target" field instructions and [bracketed] link markers
static HYPERLINK_MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)HYPERLINK\s+(?:\\[a-z]\s+)*"[^"]*"|\[[^\]]*\]"#)
        .expect("hyperlink marker pattern is valid")
});

/// Collapse every whitespace run into one space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove URL-like substrings, hyperlink markers and control characters.
pub fn strip_hyperlinks(text: &str) -> String {
    let without_markers = HYPERLINK_MARKER_PATTERN.replace_all(text, "");
    let without_urls = URL_PATTERN.replace_all(&without_markers, "");
    let printable: String = without_urls
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    collapse_whitespace(&printable)
}
