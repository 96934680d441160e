//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Base instant for generated records: 2023-11-14T22:13:20Z
pub const BASE_MILLIS: i64 = 1_700_000_000_000;

/// Builder for a projects root with one subdirectory per project
pub struct ProjectsDirBuilder {
    temp_dir: TempDir,
}

impl ProjectsDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Path of the projects root
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a project directory containing the given log files
    pub fn with_project(self, name: &str, files: &[LogFileBuilder]) -> Self {
        let project_dir = self.temp_dir.path().join(name);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");

        for file in files {
            file.create_in(&project_dir);
        }

        self
    }

    /// Add a plain file directly under the root; it is not a project
    pub fn with_stray_file(self, name: &str) -> Self {
        fs::write(self.temp_dir.path().join(name), "{}").expect("Failed to write stray file");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ProjectsDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one conversation log file
#[derive(Clone)]
pub struct LogFileBuilder {
    filename: String,
    lines: Vec<String>,
    modified: Option<i64>,
}

impl LogFileBuilder {
    pub fn new(filename: &str) -> Self {
        Self { filename: filename.to_string(), lines: Vec::new(), modified: None }
    }

    pub fn with_record(mut self, record: RecordBuilder) -> Self {
        self.lines.push(record.to_json());
        self
    }

    pub fn with_records(mut self, records: impl IntoIterator<Item = RecordBuilder>) -> Self {
        self.lines.extend(records.into_iter().map(|r| r.to_json()));
        self
    }

    /// Add a line verbatim, e.g. malformed JSON
    pub fn with_raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Set the file's modification time in Unix seconds
    pub fn modified_at(mut self, unix_seconds: i64) -> Self {
        self.modified = Some(unix_seconds);
        self
    }

    /// Create the file in the given directory and return its path
    pub fn create_in(&self, dir: &Path) -> PathBuf {
        let path = dir.join(&self.filename);
        let mut content = self.lines.join("\n");
        content.push('\n');
        fs::write(&path, content).expect("Failed to write log file");

        if let Some(seconds) = self.modified {
            filetime::set_file_mtime(&path, FileTime::from_unix_time(seconds, 0))
                .expect("Failed to set mtime");
        }

        path
    }
}

/// Builder for one JSON record line
#[derive(Clone)]
pub struct RecordBuilder {
    role: String,
    content: Value,
    timestamp: Option<Value>,
}

impl RecordBuilder {
    pub fn user(text: &str) -> Self {
        Self::with_role("user", json!(text))
    }

    pub fn assistant(text: &str) -> Self {
        Self::with_role("assistant", json!(text))
    }

    pub fn system(text: &str) -> Self {
        Self::with_role("system", json!(text))
    }

    /// Message whose content is an array of `{type, text}` parts
    pub fn parts(role: &str, parts: Value) -> Self {
        Self::with_role(role, parts)
    }

    fn with_role(role: &str, content: Value) -> Self {
        Self { role: role.to_string(), content, timestamp: Some(json!(BASE_MILLIS)) }
    }

    /// Timestamp as Unix milliseconds
    pub fn at_millis(mut self, millis: i64) -> Self {
        self.timestamp = Some(json!(millis));
        self
    }

    /// `BASE_MILLIS` plus the given number of minutes
    pub fn minutes_after_base(self, minutes: i64) -> Self {
        self.at_millis(BASE_MILLIS + minutes * 60_000)
    }

    /// Timestamp as any JSON value (seconds, ISO string, garbage)
    pub fn timestamp(mut self, value: Value) -> Self {
        self.timestamp = Some(value);
        self
    }

    pub fn without_timestamp(mut self) -> Self {
        self.timestamp = None;
        self
    }

    pub fn to_json(&self) -> String {
        let mut record = json!({
            "type": self.role,
            "message": { "role": self.role, "content": self.content },
        });
        if let Some(timestamp) = &self.timestamp {
            record["timestamp"] = timestamp.clone();
        }
        record.to_string()
    }
}
