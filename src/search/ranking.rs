//! Boundary to the external semantic ranking service.

use async_trait::async_trait;
use thiserror::Error;

/// Service that answers a ranking prompt with text containing a JSON index array
#[async_trait]
pub trait RankingCollaborator: Send + Sync {
    /// Synchronous entitlement check; `false` means ranking needs a paid tier
    fn has_access(&self) -> bool {
        true
    }

    /// Send `prompt` to the model named by `model` and return the raw response text
    async fn rank(&self, prompt: &str, model: &str) -> Result<String, RankingError>;
}

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Semantic search requires a subscription: {0}")]
    AccessDenied(String),

    #[error("Ranking service unavailable: {0}")]
    Unavailable(String),

    #[error("Ranking request failed: {0:#}")]
    Transport(#[from] anyhow::Error),
}

impl RankingError {
    /// True for explicit denials and for any error whose text names an
    /// access or subscription requirement
    pub fn is_access_denied(&self) -> bool {
        match self {
            RankingError::AccessDenied(_) => true,
            other => mentions_access_requirement(&other.to_string()),
        }
    }
}

const ACCESS_MARKERS: &[&str] =
    &["subscription", "access denied", "access required", "requires access", "not entitled"];

pub(crate) fn mentions_access_requirement(text: &str) -> bool {
    let lower = text.to_lowercase();
    ACCESS_MARKERS.iter().any(|marker| lower.contains(marker))
}
