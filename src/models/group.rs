use std::fmt;

use serde::{Serialize, Serializer};

use super::message::DisplayMessage;

/// Display section a message falls into, relative to a reference "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateCategory {
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
    ThisYear,
    Year(i32),
    /// Messages whose timestamp could not be parsed
    Unknown,
}

impl DateCategory {
    /// Fixed labels take 0..=4, years take `10000 - year` so they follow the fixed
    /// labels newest year first. `Unknown` always sorts last.
    pub fn sort_key(&self) -> i64 {
        match self {
            DateCategory::Today => 0,
            DateCategory::Yesterday => 1,
            DateCategory::ThisWeek => 2,
            DateCategory::ThisMonth => 3,
            DateCategory::ThisYear => 4,
            DateCategory::Year(year) => 10_000 - i64::from(*year),
            DateCategory::Unknown => i64::MAX,
        }
    }

    pub fn label(&self) -> String {
        match self {
            DateCategory::Today => "Today".to_string(),
            DateCategory::Yesterday => "Yesterday".to_string(),
            DateCategory::ThisWeek => "This Week".to_string(),
            DateCategory::ThisMonth => "This Month".to_string(),
            DateCategory::ThisYear => "This Year".to_string(),
            DateCategory::Year(year) => format!("{:04}", year),
            DateCategory::Unknown => "Unknown".to_string(),
        }
    }
}

impl fmt::Display for DateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for DateCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageGroup {
    pub category: DateCategory,
    pub messages: Vec<DisplayMessage>,
    pub sort_key: i64,
}

impl MessageGroup {
    pub fn new(category: DateCategory) -> Self {
        Self { category, messages: Vec::new(), sort_key: category.sort_key() }
    }
}
