/// Preview shown for messages with no text
pub const EMPTY_PREVIEW: &str = "[Empty message]";

const ELLIPSIS: &str = "...";

/// First `max_chars` characters of `content`, with `...` appended when truncated
///
/// # Examples
///
/// ```
/// use ai_history_extractor::utils::text::make_preview;
///
/// assert_eq!(make_preview("hello world", 5), "hello...");
/// assert_eq!(make_preview("", 5), "[Empty message]");
/// ```
pub fn make_preview(content: &str, max_chars: usize) -> String {
    if content.is_empty() {
        return EMPTY_PREVIEW.to_string();
    }

    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut preview = String::with_capacity(cut + ELLIPSIS.len());
            preview.push_str(&content[..cut]);
            preview.push_str(ELLIPSIS);
            preview
        }
        None => content.to_string(),
    }
}

/// Truncate to at most `max_chars` characters without adding an ellipsis
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}
