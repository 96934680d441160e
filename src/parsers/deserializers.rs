use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a field that is present in the input as `Some`, even when it is `null`
///
/// Combined with `#[serde(default)]` this separates a missing field (`None`) from an
/// explicit `null` (`Some(Value::Null)`), which plain `Option<Value>` collapses.
pub fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
