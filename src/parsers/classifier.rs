//! Decides which log records are genuine user or assistant messages.
//!
//! The sent and received extraction paths share one classifier and differ only
//! in the [`MessageProfile`] they pass in.

use serde_json::Value;

use crate::models::{ContentShape, LogRecord, Role};

const CONTENT_TYPE_TEXT: &str = "text";

/// Text pattern that marks synthetic, tool-injected content rather than authored input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Contains(&'static str),
    StartsWith(&'static str),
}

impl Exclusion {
    pub fn matches(&self, content: &str) -> bool {
        match self {
            Exclusion::Contains(marker) => content.contains(marker),
            Exclusion::StartsWith(prefix) => content.trim_start().starts_with(prefix),
        }
    }
}

/// Slash-command echoes and interruption notices written into the user stream
pub const USER_EXCLUSIONS: &[Exclusion] = &[
    Exclusion::Contains("<command-message>"),
    Exclusion::Contains("<command-name>"),
    Exclusion::StartsWith("[Request interrupted"),
];

/// What to do with records whose content carries no text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyContentPolicy {
    /// Drop `null`, missing, empty and whitespace-only content
    RejectBlank,
    /// Keep an explicit `null` as an empty message; drop missing content and content
    /// that flattens to the empty string
    KeepExplicitNull,
}

/// Configuration of one extraction path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageProfile {
    pub role: Role,
    /// Prefix of the display ids assigned by the orchestrator
    pub id_prefix: &'static str,
    pub exclusions: &'static [Exclusion],
    pub empty_content: EmptyContentPolicy,
}

impl MessageProfile {
    /// Messages the user sent
    pub const SENT: MessageProfile = MessageProfile {
        role: Role::User,
        id_prefix: "sent",
        exclusions: USER_EXCLUSIONS,
        empty_content: EmptyContentPolicy::RejectBlank,
    };

    /// Messages the assistant sent back
    pub const RECEIVED: MessageProfile = MessageProfile {
        role: Role::Assistant,
        id_prefix: "received",
        exclusions: &[],
        empty_content: EmptyContentPolicy::KeepExplicitNull,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMessage {
    pub role: Role,
    pub content: String,
}

/// Classify one decoded record against `profile`
///
/// Returns `None` when the record is not a message of the profile's role or its
/// content is excluded. Pure: the same record always yields the same result.
pub fn classify_record(record: &LogRecord, profile: &MessageProfile) -> Option<ClassifiedMessage> {
    let message = record.message.as_ref()?;
    if message.role.as_deref() != Some(profile.role.as_str()) {
        return None;
    }

    let content = match message.content_shape() {
        ContentShape::Text(text) => text.to_string(),
        ContentShape::Parts(parts) => flatten_parts(parts),
        ContentShape::Null => match profile.empty_content {
            EmptyContentPolicy::KeepExplicitNull => {
                return Some(ClassifiedMessage { role: profile.role, content: String::new() });
            }
            EmptyContentPolicy::RejectBlank => return None,
        },
        ContentShape::Missing | ContentShape::Unsupported => return None,
    };

    if profile.exclusions.iter().any(|exclusion| exclusion.matches(&content)) {
        return None;
    }

    let keep = match profile.empty_content {
        EmptyContentPolicy::RejectBlank => !content.trim().is_empty(),
        EmptyContentPolicy::KeepExplicitNull => !content.is_empty(),
    };

    keep.then_some(ClassifiedMessage { role: profile.role, content })
}

/// Join the `text` of every `"text"` part with newlines, dropping images, tool
/// calls and other part types
pub fn flatten_parts(parts: &[Value]) -> String {
    let texts: Vec<&str> = parts
        .iter()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some(CONTENT_TYPE_TEXT))
        .map(|part| part.get("text").and_then(Value::as_str).unwrap_or(""))
        .collect();

    texts.join("\n")
}
