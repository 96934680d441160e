//! Ranking collaborator backed by an assistant CLI in print mode.
//!
//! Runs `<program> -p --output-format text --model <model> <prompt>` and returns
//! stdout. The child is killed if the ranking future is dropped, so an aborted
//! search does not leave a process running.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::search::ranking::{RankingCollaborator, RankingError, mentions_access_requirement};

pub const DEFAULT_RANKER_PROGRAM: &str = "claude";
pub const DEFAULT_RANKER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct CommandRanker {
    program: PathBuf,
    timeout: Duration,
}

impl Default for CommandRanker {
    fn default() -> Self {
        Self::new(DEFAULT_RANKER_PROGRAM)
    }
}

impl CommandRanker {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), timeout: DEFAULT_RANKER_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl RankingCollaborator for CommandRanker {
    async fn rank(&self, prompt: &str, model: &str) -> Result<String, RankingError> {
        let program = self.program.display().to_string();
        debug!("Ranking with {} (model {})", program, model);

        let mut command = Command::new(&self.program);
        command
            .args(["-p", "--output-format", "text", "--model", model, prompt])
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                RankingError::Unavailable(format!(
                    "{} timed out after {}s",
                    program,
                    self.timeout.as_secs_f32()
                ))
            })?
            .map_err(|e| RankingError::Unavailable(format!("Failed to run {}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("{} exited with {}", program, output.status);
            if mentions_access_requirement(&stderr) {
                return Err(RankingError::AccessDenied(stderr));
            }
            return Err(anyhow!("{} exited with {}: {}", program, output.status, stderr).into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
