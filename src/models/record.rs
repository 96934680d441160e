use serde::Deserialize;
use serde_json::Value;

/// Wire shape of one line in a conversation log file.
///
/// Every field is optional; lines that are not conversation turns (summaries,
/// snapshots, hook output) decode fine and are rejected later by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogRecord {
    #[serde(default)]
    pub message: Option<RecordMessage>,
    /// `null` and a missing field both decode to `None`
    #[serde(default)]
    pub timestamp: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecordMessage {
    #[serde(default)]
    pub role: Option<String>,
    /// `Some(Value::Null)` for an explicit `null`, `None` when the field is missing
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_present")]
    pub content: Option<Value>,
}

/// How a record's `content` field is encoded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentShape<'a> {
    Missing,
    Null,
    Text(&'a str),
    Parts(&'a [Value]),
    /// Numbers, booleans or objects; never produced by a well-formed log
    Unsupported,
}

impl RecordMessage {
    pub fn content_shape(&self) -> ContentShape<'_> {
        match &self.content {
            None => ContentShape::Missing,
            Some(Value::Null) => ContentShape::Null,
            Some(Value::String(text)) => ContentShape::Text(text),
            Some(Value::Array(parts)) => ContentShape::Parts(parts),
            Some(_) => ContentShape::Unsupported,
        }
    }
}
