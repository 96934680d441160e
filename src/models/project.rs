use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A project directory ranked by the newest modification time among its log files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectActivity {
    pub name: String,
    pub path: PathBuf,
    pub most_recent_file_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFileEntry {
    pub name: String,
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
}

/// One project kept by the directory selector together with its newest log files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedProject {
    #[serde(flatten)]
    pub activity: ProjectActivity,
    pub files: Vec<LogFileEntry>,
}
