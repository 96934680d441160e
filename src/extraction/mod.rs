//! Extraction pipeline over the projects tree
//!
//! - [`project_discovery`] - Directory selector: ranks projects and log files under hard caps
//! - [`builder`] - Orchestrator: parses selected files in sequence, merges and assigns ids
//! - [`gate`] - Per-view guard against overlapping extraction calls

pub mod builder;
pub mod gate;
pub mod project_discovery;

pub use builder::{
    Extraction, ExtractionStatus, HistoryExtractor, build_display_messages,
    extract_received_messages, extract_sent_messages,
};
pub use gate::{LoadingGate, LoadingTicket};
pub use project_discovery::{list_log_files, rank_projects, select_projects};
