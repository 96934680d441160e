//! AI History Extractor - Recent messages from Claude Code conversation history
//!
//! This library reads the conversation logs Claude Code keeps under
//! `~/.claude/projects/` and turns them into display-ready messages. It provides:
//!
//! - Bounded selection of the most recently active projects and log files
//! - Streaming, line-by-line parsing of `.jsonl` logs with per-file retention caps
//! - Classification of user and assistant messages, including multi-part content
//! - Grouping of messages into date sections (Today, Yesterday, This Week, ...)
//! - Exact and semantic search, with debouncing for interactive use
//!
//! Extraction never fails outright: unreadable files and directories are skipped
//! and reported through [`Extraction::status`].
//!
//! # Example
//!
//! ```no_run
//! use ai_history_extractor::{HistoryExtractor, group_by_date};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let extractor = HistoryExtractor::from_environment()?;
//! let extraction = extractor.extract_sent(&CancellationToken::new()).await;
//! for group in group_by_date(extraction.messages) {
//!     println!("{}: {} messages", group.category, group.messages.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod extraction;
pub mod grouping;
pub mod models;
pub mod parsers;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use config::{ExtractorConfig, ScanLimits, SemanticSearchConfig};
pub use extraction::{
    Extraction, ExtractionStatus, HistoryExtractor, LoadingGate, extract_received_messages,
    extract_sent_messages, select_projects,
};
pub use grouping::{group_by_date, group_by_date_at};
pub use models::{DateCategory, DisplayMessage, MessageGroup, NormalizedMessage, Role, Timestamp};
pub use parsers::{MessageProfile, normalize_timestamp, parse_conversation_file};
pub use search::{LiveSearch, SearchStatus, exact_search, semantic_search};
