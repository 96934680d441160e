//! Extraction and search settings.
//!
//! The defaults bound every extraction call to at most
//! `max_projects * max_files_per_project` files and
//! `max_messages_per_file` retained messages per file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::utils::get_projects_dir;

pub const DEFAULT_MAX_PROJECTS: usize = 5;
pub const DEFAULT_MAX_FILES_PER_PROJECT: usize = 5;
pub const DEFAULT_MAX_MESSAGES_PER_FILE: usize = 10;
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

pub const DEFAULT_RANKING_MODEL: &str = "claude-haiku";
pub const DEFAULT_RANKING_PREVIEW_CHARS: usize = 200;
pub const DEFAULT_SEMANTIC_DEBOUNCE: Duration = Duration::from_millis(500);

/// Hard caps applied while scanning the projects tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    pub max_projects: usize,
    pub max_files_per_project: usize,
    pub max_messages_per_file: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_projects: DEFAULT_MAX_PROJECTS,
            max_files_per_project: DEFAULT_MAX_FILES_PER_PROJECT,
            max_messages_per_file: DEFAULT_MAX_MESSAGES_PER_FILE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Directory holding one subdirectory per project
    pub projects_root: PathBuf,
    pub limits: ScanLimits,
    pub preview_chars: usize,
}

impl ExtractorConfig {
    pub fn new(projects_root: impl Into<PathBuf>) -> Self {
        Self {
            projects_root: projects_root.into(),
            limits: ScanLimits::default(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    /// Config rooted at `<claude dir>/projects`, see [`crate::utils::get_claude_dir`]
    pub fn from_environment() -> Result<Self> {
        Ok(Self::new(get_projects_dir()?))
    }

    pub fn with_limits(mut self, limits: ScanLimits) -> Self {
        self.limits = limits;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticSearchConfig {
    /// Model selector forwarded to the ranking collaborator
    pub model: String,
    /// Characters of each item preview embedded in the ranking prompt
    pub preview_chars: usize,
    pub debounce: Duration,
}

impl Default for SemanticSearchConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_RANKING_MODEL.to_string(),
            preview_chars: DEFAULT_RANKING_PREVIEW_CHARS,
            debounce: DEFAULT_SEMANTIC_DEBOUNCE,
        }
    }
}
