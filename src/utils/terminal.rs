//! Terminal output sanitization for the diagnostic CLI
//!
//! Message text comes straight from log files and may contain ANSI escape sequences
//! or control characters. Plain-text CLI output passes it through
//! [`sanitize_single_line`] before printing.

/// Strips ANSI CSI escape sequences and control characters (except tab and newlines)
///
/// # Examples
///
/// ```
/// use ai_history_extractor::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // CSI sequences end at the first ASCII letter
            for next_ch in chars.by_ref() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Sanitized text collapsed onto one line, for list-style output
pub fn sanitize_single_line(text: &str) -> String {
    strip_ansi_codes(text).split_whitespace().collect::<Vec<_>>().join(" ")
}
