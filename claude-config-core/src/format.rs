//! Text helpers shared by the extractor and the document renderers.

/// Keep at most `max_chars` characters of `text`.
///
/// Counts `char`s, not bytes, so Korean text is never cut mid-codepoint.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
