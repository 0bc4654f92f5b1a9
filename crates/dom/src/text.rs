use crate::dom::Fragment;

/// Plain text of an HTML fragment: tags removed, whitespace runs collapsed to
/// a single space, trimmed.
#[must_use]
pub fn extract_text_content(html: &str) -> String {
    Fragment::parse(html).text_content()
}

/// Collapse every whitespace run to one space and trim both ends
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
