use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ScanLimits;
use crate::models::{LogFileEntry, ProjectActivity, SelectedProject};

/// Extension of conversation log files
pub const LOG_FILE_EXTENSION: &str = "jsonl";

/// Pick the most recently active projects under `root` and their newest log files
///
/// Projects are ranked by the newest modification time among their own log files,
/// since a directory's mtime is not reliably bumped by appends to files inside it.
/// At most `limits.max_projects` projects and `limits.max_files_per_project` files per
/// project are returned, newest first.
///
/// # Errors
///
/// Returns an error only if `root` itself cannot be enumerated. Unreadable projects
/// and files are logged and skipped. Cancellation returns whatever was selected so far.
pub async fn select_projects(
    root: &Path,
    limits: &ScanLimits,
    cancel: &CancellationToken,
) -> Result<Vec<SelectedProject>> {
    let mut ranked = rank_projects(root, cancel).await?;
    ranked.truncate(limits.max_projects);

    let mut selected = Vec::with_capacity(ranked.len());
    for activity in ranked {
        if cancel.is_cancelled() {
            break;
        }

        match list_log_files(&activity.path, cancel).await {
            Ok(mut files) => {
                files.truncate(limits.max_files_per_project);
                selected.push(SelectedProject { activity, files });
            }
            Err(e) => {
                warn!("Skipping project {}: {:#}", activity.path.display(), e);
            }
        }
    }

    Ok(selected)
}

/// Every project directory under `root`, most recently active first
pub async fn rank_projects(root: &Path, cancel: &CancellationToken) -> Result<Vec<ProjectActivity>> {
    let mut entries = fs::read_dir(root)
        .await
        .with_context(|| format!("Failed to read projects directory: {}", root.display()))?;

    let mut projects = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to read directory entry in {}", root.display()))?
    {
        if cancel.is_cancelled() {
            break;
        }

        let path = entry.path();
        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Skipping unreadable entry {}: {}", path.display(), e);
                continue;
            }
        };
        if !metadata.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let most_recent_file_time = match newest_log_time(&path, cancel).await {
            Ok(Some(time)) => time,
            // Nothing to extract from a project without log files
            Ok(None) => continue,
            Err(e) => match metadata.modified() {
                Ok(modified) => {
                    debug!(
                        "Falling back to directory mtime for {}: {:#}",
                        path.display(),
                        e
                    );
                    modified.into()
                }
                Err(_) => continue,
            },
        };

        projects.push(ProjectActivity { name, path, most_recent_file_time });
    }

    projects.sort_by(|a, b| {
        b.most_recent_file_time.cmp(&a.most_recent_file_time).then_with(|| a.name.cmp(&b.name))
    });

    Ok(projects)
}

/// Every readable log file in `project_dir`, newest first
pub async fn list_log_files(
    project_dir: &Path,
    cancel: &CancellationToken,
) -> Result<Vec<LogFileEntry>> {
    let mut entries = fs::read_dir(project_dir)
        .await
        .with_context(|| format!("Failed to read project directory: {}", project_dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if cancel.is_cancelled() {
            break;
        }

        let path = entry.path();
        if !is_log_file(&path) {
            continue;
        }

        match log_file_mtime(&path).await {
            Some(modified) => files.push(LogFileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                modified,
            }),
            None => debug!("Skipping unreadable log file {}", path.display()),
        }
    }

    files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));

    Ok(files)
}

/// Newest log file mtime in `project_dir` without collecting the file list
async fn newest_log_time(
    project_dir: &Path,
    cancel: &CancellationToken,
) -> Result<Option<DateTime<Utc>>> {
    let mut entries = fs::read_dir(project_dir).await?;
    let mut newest: Option<DateTime<Utc>> = None;

    while let Some(entry) = entries.next_entry().await? {
        if cancel.is_cancelled() {
            break;
        }

        let path = entry.path();
        if !is_log_file(&path) {
            continue;
        }
        if let Some(modified) = log_file_mtime(&path).await {
            newest = newest.max(Some(modified));
        }
    }

    Ok(newest)
}

async fn log_file_mtime(path: &Path) -> Option<DateTime<Utc>> {
    let metadata = fs::metadata(path).await.ok()?;
    if !metadata.is_file() {
        return None;
    }
    metadata.modified().ok().map(DateTime::<Utc>::from)
}

fn is_log_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == LOG_FILE_EXTENSION)
}
