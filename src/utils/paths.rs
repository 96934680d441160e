use std::borrow::Cow;
use std::env;
use std::path::Path;

/// Session identifier for a conversation log file: the file name without its extension
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ai_history_extractor::utils::session_id_from_path;
///
/// let path = Path::new("/home/dev/.claude/projects/-home-dev-app/4f1c.jsonl");
/// assert_eq!(session_id_from_path(path), "4f1c");
/// ```
pub fn session_id_from_path(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref()).filter(|h| !h.is_empty());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_session_id_strips_extension() {
        let path = PathBuf::from("/tmp/projects/demo/550e8400-e29b-41d4-a716-446655440000.jsonl");
        assert_eq!(session_id_from_path(&path), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_session_id_keeps_inner_dots() {
        let path = PathBuf::from("/tmp/agent-1.backup.jsonl");
        assert_eq!(session_id_from_path(&path), "agent-1.backup");
    }

    #[test]
    fn test_session_id_empty_path() {
        assert_eq!(session_id_from_path(Path::new("")), "");
    }

    #[test]
    fn test_format_path_with_tilde() {
        let path = PathBuf::from("/Users/testuser/.claude/projects");
        let formatted = format_path_with_tilde_internal(&path, Some("/Users/testuser"));
        assert_eq!(formatted, "~/.claude/projects");

        let outside = PathBuf::from("/opt/local/bin");
        let formatted = format_path_with_tilde_internal(&outside, Some("/Users/testuser"));
        assert_eq!(formatted, "/opt/local/bin");
    }
}
