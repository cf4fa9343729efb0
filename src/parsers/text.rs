/// Collapse every run of whitespace into a single space and trim both ends.
///
/// Newlines, tabs and non-breaking spaces are all treated as whitespace, so
/// the result has no line or paragraph structure left.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate `text` to at most `max_chars` characters, never splitting a character
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
