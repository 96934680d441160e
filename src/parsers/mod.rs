//! Line-level parsing of assistant conversation logs
//!
//! # Error Handling Strategy
//!
//! Parsing degrades gracefully instead of failing the caller:
//!
//! - **Individual line failures**: Blank lines, undecodable JSON and invalid UTF-8 are
//!   counted in [`ParseStats`] and skipped. One corrupt line never aborts a file.
//!
//! - **File-level failures**: A file that cannot be opened, or whose byte stream
//!   errors mid-read, yields [`FileOutcome::Failed`] and contributes no messages.
//!
//! - **Timestamps**: [`normalize_timestamp`] never fails; unparseable values become
//!   [`Timestamp::Invalid`](crate::models::Timestamp::Invalid), which sorts after every
//!   valid instant.

pub mod classifier;
pub mod conversation;
pub mod deserializers;
pub mod timestamp;

pub use classifier::{ClassifiedMessage, EmptyContentPolicy, Exclusion, MessageProfile, classify_record};
pub use conversation::{FileOutcome, LogSource, ParseStats, parse_conversation_file, parse_conversation_stream};
pub use timestamp::{normalize_timestamp, normalize_timestamp_at};
