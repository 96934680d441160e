//! Extraction orchestrator for conversation history.
//!
//! # Error Handling Strategy
//!
//! Extraction never returns an error to its caller:
//!
//! - **Root failures**: An unreadable projects root yields [`ExtractionStatus::Unavailable`]
//!   with no messages, so the UI shows "no history found" instead of crashing.
//! - **File-level failures**: A file that fails to open or read is logged and
//!   counted in [`Extraction::files_failed`]; the call reports [`ExtractionStatus::Partial`].
//! - **Cancellation**: A cancelled call stops at the next suspension point and
//!   reports [`ExtractionStatus::Cancelled`] with no messages.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ExtractorConfig;
use crate::extraction::project_discovery::select_projects;
use crate::models::{DisplayMessage, NormalizedMessage};
use crate::parsers::{FileOutcome, LogSource, MessageProfile, parse_conversation_file};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ExtractionStatus {
    /// Every selected file was read
    Complete,
    /// Some selected files failed and contributed nothing
    Partial,
    /// The projects root could not be enumerated
    Unavailable { reason: String },
    Cancelled,
}

/// Result of one extraction call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    /// Newest first; ids follow this order
    pub messages: Vec<DisplayMessage>,
    pub status: ExtractionStatus,
    pub files_scanned: usize,
    pub files_failed: usize,
}

impl Extraction {
    fn without_messages(status: ExtractionStatus) -> Self {
        Self { messages: Vec::new(), status, files_scanned: 0, files_failed: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Runs the selection → parse → merge pipeline over a projects root
#[derive(Debug, Clone)]
pub struct HistoryExtractor {
    config: ExtractorConfig,
}

impl HistoryExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extractor over `~/.claude/projects` with default limits
    pub fn from_environment() -> Result<Self> {
        Ok(Self::new(ExtractorConfig::from_environment()?))
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Messages the user sent, newest first, with `sent-<n>` ids
    pub async fn extract_sent(&self, cancel: &CancellationToken) -> Extraction {
        self.extract(&MessageProfile::SENT, cancel).await
    }

    /// Messages the assistant sent back, newest first, with `received-<n>` ids
    pub async fn extract_received(&self, cancel: &CancellationToken) -> Extraction {
        self.extract(&MessageProfile::RECEIVED, cancel).await
    }

    /// Run the pipeline for any profile
    ///
    /// Files are parsed one after another, never concurrently, so at most one log
    /// file is open at a time.
    pub async fn extract(&self, profile: &MessageProfile, cancel: &CancellationToken) -> Extraction {
        let root = &self.config.projects_root;
        let limits = &self.config.limits;

        let projects = match select_projects(root, limits, cancel).await {
            Ok(projects) => projects,
            Err(e) => {
                warn!("No history available: {:#}", e);
                return Extraction::without_messages(ExtractionStatus::Unavailable {
                    reason: format!("{:#}", e),
                });
            }
        };

        let mut collected: Vec<NormalizedMessage> = Vec::new();
        let mut files_scanned = 0;
        let mut files_failed = 0;

        for project in &projects {
            for file in &project.files {
                let source = LogSource::new(file.path.clone(), project.activity.path.clone());
                let outcome =
                    parse_conversation_file(&source, profile, limits.max_messages_per_file, cancel)
                        .await;

                match outcome {
                    FileOutcome::Parsed { messages, .. } => {
                        files_scanned += 1;
                        collected.extend(messages);
                    }
                    FileOutcome::Failed { .. } => {
                        files_scanned += 1;
                        files_failed += 1;
                    }
                    FileOutcome::Cancelled { .. } => {
                        debug!("Extraction cancelled after {} files", files_scanned);
                        return Extraction::without_messages(ExtractionStatus::Cancelled);
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            return Extraction::without_messages(ExtractionStatus::Cancelled);
        }

        let messages =
            build_display_messages(collected, profile.id_prefix, self.config.preview_chars);
        let status =
            if files_failed > 0 { ExtractionStatus::Partial } else { ExtractionStatus::Complete };

        info!(
            "Extracted {} {} messages from {} projects ({} files scanned, {} failed)",
            messages.len(),
            profile.id_prefix,
            projects.len(),
            files_scanned,
            files_failed
        );

        Extraction { messages, status, files_scanned, files_failed }
    }
}

/// Sort newest first and assign `<prefix>-<position>` ids and previews
///
/// The sort is stable, so messages with equal timestamps keep their relative order.
pub fn build_display_messages(
    mut messages: Vec<NormalizedMessage>,
    id_prefix: &str,
    preview_chars: usize,
) -> Vec<DisplayMessage> {
    messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    messages
        .into_iter()
        .enumerate()
        .map(|(index, message)| {
            DisplayMessage::new(format!("{}-{}", id_prefix, index), message, preview_chars)
        })
        .collect()
}

/// Convenience wrapper: extract sent messages from `projects_root` with default limits
pub async fn extract_sent_messages(projects_root: impl Into<PathBuf>) -> Extraction {
    HistoryExtractor::new(ExtractorConfig::new(projects_root))
        .extract_sent(&CancellationToken::new())
        .await
}

/// Convenience wrapper: extract received messages from `projects_root` with default limits
pub async fn extract_received_messages(projects_root: impl Into<PathBuf>) -> Extraction {
    HistoryExtractor::new(ExtractorConfig::new(projects_root))
        .extract_received(&CancellationToken::new())
        .await
}
