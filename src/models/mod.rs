//! Data models for assistant conversation history.
//!
//! - [`LogRecord`] - Wire shape of one line in a conversation log file
//! - [`NormalizedMessage`] - A classified message with flattened text content
//! - [`DisplayMessage`] - A normalized message with a stable id and preview
//! - [`ProjectActivity`] / [`SelectedProject`] - Directory selector output
//! - [`MessageGroup`] - Date-bucketed display sections

pub mod group;
pub mod message;
pub mod project;
pub mod record;

pub use group::{DateCategory, MessageGroup};
pub use message::{DisplayMessage, NormalizedMessage, Role, Timestamp};
pub use project::{LogFileEntry, ProjectActivity, SelectedProject};
pub use record::{ContentShape, LogRecord, RecordMessage};
