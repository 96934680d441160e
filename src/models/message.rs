use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::utils::text::make_preview;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute time of a message.
///
/// `Invalid` is produced for timestamp strings that no date format accepts. It orders
/// before every valid instant, so a newest-first sort always places it last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Timestamp {
    Invalid,
    Valid(DateTime<Utc>),
}

impl Timestamp {
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Valid(dt) => Some(*dt),
            Timestamp::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Timestamp::Valid(_))
    }

    pub fn timestamp_millis(&self) -> Option<i64> {
        self.as_datetime().map(|dt| dt.timestamp_millis())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Valid(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Valid(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Timestamp::Invalid => f.write_str("invalid date"),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Timestamp::Valid(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Timestamp::Invalid => serializer.serialize_none(),
        }
    }
}

/// A message extracted from one log line, content already flattened to plain text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: Timestamp,
    pub session_id: String,
    pub project_path: PathBuf,
}

/// UI-ready message with a stable id and a short preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMessage {
    pub id: String,
    #[serde(flatten)]
    pub message: NormalizedMessage,
    pub preview: String,
}

impl DisplayMessage {
    pub fn new(id: String, message: NormalizedMessage, preview_chars: usize) -> Self {
        let preview = make_preview(&message.content, preview_chars);
        Self { id, message, preview }
    }

    pub fn content(&self) -> &str {
        &self.message.content
    }

    pub fn timestamp(&self) -> Timestamp {
        self.message.timestamp
    }
}
