/// Edge case integration tests
///
/// These tests cover filesystem quirks, data edge cases, and other unusual scenarios
mod common;

use std::fs;

use ai_history_extractor::{DateCategory, Timestamp, extract_sent_messages, group_by_date};
use common::{LogFileBuilder, ProjectsDirBuilder, RecordBuilder};
use serde_json::json;

fn project_with_raw_log(content: &[u8]) -> tempfile::TempDir {
    let projects = ProjectsDirBuilder::new().with_project("p", &[]).build();
    fs::write(projects.path().join("p").join("session.jsonl"), content).unwrap();
    projects
}

#[tokio::test]
async fn test_edge_case_mixed_line_endings() {
    let content = "{\"message\":{\"role\":\"user\",\"content\":\"one\"},\"timestamp\":1000}\r\n\
                   {\"message\":{\"role\":\"user\",\"content\":\"two\"},\"timestamp\":2000}\n\
                   {\"message\":{\"role\":\"user\",\"content\":\"three\"},\"timestamp\":3000}";
    let projects = project_with_raw_log(content.as_bytes());

    let extraction = extract_sent_messages(projects.path()).await;

    let contents: Vec<&str> = extraction.messages.iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["three", "two", "one"]);
}

#[tokio::test]
async fn test_edge_case_truncated_json_at_eof() {
    // Interrupted write leaves a partial last line
    let content = r#"{"message":{"role":"user","content":"complete"},"timestamp":1000}
{"message":{"role":"user","content":"incompl"#;
    let projects = project_with_raw_log(content.as_bytes());

    let extraction = extract_sent_messages(projects.path()).await;

    assert_eq!(extraction.messages.len(), 1);
    assert_eq!(extraction.messages[0].content(), "complete");
}

#[tokio::test]
async fn test_edge_case_invalid_utf8_line_does_not_abort_file() {
    let mut content = Vec::new();
    content.extend_from_slice(br#"{"message":{"role":"user","content":"before"},"timestamp":1000}"#);
    content.extend_from_slice(b"\n\xff\xfe garbage \xc3\n");
    content.extend_from_slice(br#"{"message":{"role":"user","content":"after"},"timestamp":2000}"#);
    let projects = project_with_raw_log(&content);

    let extraction = extract_sent_messages(projects.path()).await;

    let contents: Vec<&str> = extraction.messages.iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["after", "before"]);
}

#[tokio::test]
async fn test_edge_case_unicode_preview_counts_characters() {
    let text = "日本語のテキスト🎉".repeat(12);
    let projects = ProjectsDirBuilder::new()
        .with_project("p", &[LogFileBuilder::new("s.jsonl").with_record(RecordBuilder::user(&text))])
        .build();

    let extraction = extract_sent_messages(projects.path()).await;

    let message = &extraction.messages[0];
    assert_eq!(message.content(), text);
    assert!(message.preview.ends_with("..."));
    assert_eq!(message.preview.chars().count(), 103);
}

#[tokio::test]
async fn test_edge_case_very_long_line() {
    let text = "x".repeat(2 * 1024 * 1024);
    let projects = ProjectsDirBuilder::new()
        .with_project("p", &[LogFileBuilder::new("s.jsonl").with_record(RecordBuilder::user(&text))])
        .build();

    let extraction = extract_sent_messages(projects.path()).await;

    assert_eq!(extraction.messages[0].content().len(), text.len());
    assert_eq!(extraction.messages[0].preview.len(), 103);
}

#[tokio::test]
async fn test_edge_case_whitespace_only_user_message_is_dropped() {
    let projects = ProjectsDirBuilder::new()
        .with_project(
            "p",
            &[LogFileBuilder::new("s.jsonl")
                .with_record(RecordBuilder::user("   \n\t"))
                .with_record(RecordBuilder::user(""))
                .with_record(RecordBuilder::parts("user", json!(null)))
                .with_record(RecordBuilder::user("kept"))],
        )
        .build();

    let extraction = extract_sent_messages(projects.path()).await;

    assert_eq!(extraction.messages.len(), 1);
    assert_eq!(extraction.messages[0].content(), "kept");
}

#[tokio::test]
async fn test_edge_case_non_log_files_and_subdirectories_ignored() {
    let projects = ProjectsDirBuilder::new()
        .with_project("p", &[LogFileBuilder::new("s.jsonl").with_record(RecordBuilder::user("real"))])
        .build();
    let project_dir = projects.path().join("p");
    fs::write(project_dir.join("notes.json"), r#"{"message":{"role":"user","content":"json"}}"#)
        .unwrap();
    fs::write(project_dir.join("backup.jsonl.bak"), r#"{"message":{"role":"user","content":"bak"}}"#)
        .unwrap();
    let nested = project_dir.join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("deep.jsonl"), r#"{"message":{"role":"user","content":"deep"}}"#).unwrap();

    let extraction = extract_sent_messages(projects.path()).await;

    let contents: Vec<&str> = extraction.messages.iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["real"]);
    assert_eq!(extraction.files_scanned, 1);
}

#[tokio::test]
async fn test_edge_case_non_utf8_filenames() {
    #[cfg(unix)]
    {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let projects = ProjectsDirBuilder::new().with_project("p", &[]).build();
        let odd_name = OsStr::from_bytes(b"session-\xff\xfe.jsonl");
        fs::write(
            projects.path().join("p").join(odd_name),
            r#"{"message":{"role":"user","content":"odd file"},"timestamp":1000}"#,
        )
        .unwrap();

        let extraction = extract_sent_messages(projects.path()).await;

        assert_eq!(extraction.messages.len(), 1);
        assert!(extraction.messages[0].message.session_id.starts_with("session-"));
    }
}

#[tokio::test]
async fn test_edge_case_duplicate_timestamps_keep_file_order() {
    let projects = ProjectsDirBuilder::new()
        .with_project(
            "p",
            &[LogFileBuilder::new("s.jsonl").with_records(
                ["first", "second", "third"].map(|text| RecordBuilder::user(text).at_millis(5_000)),
            )],
        )
        .build();

    let extraction = extract_sent_messages(projects.path()).await;

    let contents: Vec<&str> = extraction.messages.iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_edge_case_zero_and_far_future_timestamps() {
    let projects = ProjectsDirBuilder::new()
        .with_project(
            "p",
            &[LogFileBuilder::new("s.jsonl")
                .with_record(RecordBuilder::user("epoch").timestamp(json!(0)))
                .with_record(RecordBuilder::user("future").at_millis(4_102_444_800_000))
                .with_record(RecordBuilder::user("overflow").timestamp(json!(1e300)))],
        )
        .build();

    let extraction = extract_sent_messages(projects.path()).await;

    let contents: Vec<&str> = extraction.messages.iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["future", "epoch", "overflow"]);
    assert_eq!(extraction.messages[1].timestamp().timestamp_millis(), Some(0));
    assert_eq!(extraction.messages[2].timestamp(), Timestamp::Invalid);

    // Clock skew: future messages are shown with today's
    let groups = group_by_date(extraction.messages);
    assert_eq!(groups[0].category, DateCategory::Today);
    assert_eq!(groups[0].messages[0].content(), "future");
}
