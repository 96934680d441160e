use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::models::{LogRecord, NormalizedMessage, Timestamp};
use crate::parsers::classifier::{MessageProfile, classify_record};
use crate::parsers::timestamp::normalize_timestamp;
use crate::utils::session_id_from_path;

const READ_BUFFER_BYTES: usize = 64 * 1024;

/// One conversation log file and the identifiers attached to its messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    pub path: PathBuf,
    pub session_id: String,
    pub project_path: PathBuf,
}

impl LogSource {
    /// Session id is derived from the file name
    pub fn new(path: impl Into<PathBuf>, project_path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session_id = session_id_from_path(&path);
        Self { path, session_id, project_path: project_path.into() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines_read: usize,
    pub blank_lines: usize,
    pub malformed_lines: usize,
    pub matched: usize,
}

/// Result of parsing one file. Failures are values, never errors.
#[derive(Debug)]
pub enum FileOutcome {
    /// Newest-first, at most the retention limit
    Parsed { messages: Vec<NormalizedMessage>, stats: ParseStats },
    /// Opening or reading the file failed; nothing from the file is kept
    Failed { error: anyhow::Error, stats: ParseStats },
    Cancelled { stats: ParseStats },
}

impl FileOutcome {
    pub fn messages(&self) -> &[NormalizedMessage] {
        match self {
            FileOutcome::Parsed { messages, .. } => messages,
            _ => &[],
        }
    }

    pub fn into_messages(self) -> Vec<NormalizedMessage> {
        match self {
            FileOutcome::Parsed { messages, .. } => messages,
            _ => Vec::new(),
        }
    }

    pub fn stats(&self) -> ParseStats {
        match self {
            FileOutcome::Parsed { stats, .. }
            | FileOutcome::Failed { stats, .. }
            | FileOutcome::Cancelled { stats } => *stats,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FileOutcome::Cancelled { .. })
    }
}

/// Stream a conversation log file and keep its `limit` newest messages for `profile`
///
/// The file is read one line at a time; undecodable lines are skipped. Any error
/// opening or reading the file yields [`FileOutcome::Failed`]. The file handle is
/// owned by the reader and released on every return path.
pub async fn parse_conversation_file(
    source: &LogSource,
    profile: &MessageProfile,
    limit: usize,
    cancel: &CancellationToken,
) -> FileOutcome {
    if cancel.is_cancelled() {
        return FileOutcome::Cancelled { stats: ParseStats::default() };
    }

    let file = match open_log_file(&source.path).await {
        Ok(file) => file,
        Err(error) => {
            warn!("Skipping {}: {:#}", source.path.display(), error);
            return FileOutcome::Failed { error, stats: ParseStats::default() };
        }
    };

    parse_conversation_stream(
        BufReader::with_capacity(READ_BUFFER_BYTES, file),
        source,
        profile,
        limit,
        cancel,
    )
    .await
}

/// [`parse_conversation_file`] over an already-open byte stream
pub async fn parse_conversation_stream<R>(
    reader: R,
    source: &LogSource,
    profile: &MessageProfile,
    limit: usize,
    cancel: &CancellationToken,
) -> FileOutcome
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = ParseStats::default();
    let mut newest = NewestMessages::new(limit);

    match read_messages(reader, source, profile, cancel, &mut stats, &mut newest).await {
        Ok(Completion::EndOfData) => {
            if stats.malformed_lines > 0 {
                debug!(
                    "Parsed {}: {} matches ({} malformed lines skipped)",
                    source.path.display(),
                    stats.matched,
                    stats.malformed_lines
                );
            }
            FileOutcome::Parsed { messages: newest.into_sorted(), stats }
        }
        Ok(Completion::Cancelled) => FileOutcome::Cancelled { stats },
        Err(error) => {
            warn!(
                "Discarding {} after read error at line {}: {:#}",
                source.path.display(),
                stats.lines_read + 1,
                error
            );
            FileOutcome::Failed { error, stats }
        }
    }
}

async fn open_log_file(path: &Path) -> Result<File> {
    File::open(path)
        .await
        .with_context(|| format!("Failed to open conversation file: {}", path.display()))
}

enum Completion {
    EndOfData,
    Cancelled,
}

async fn read_messages<R>(
    mut reader: R,
    source: &LogSource,
    profile: &MessageProfile,
    cancel: &CancellationToken,
    stats: &mut ParseStats,
    newest: &mut NewestMessages,
) -> Result<Completion>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(Completion::Cancelled),
            read = reader.read_until(b'\n', &mut buf) => read,
        };
        if read.context("Failed to read line from conversation file")? == 0 {
            return Ok(Completion::EndOfData);
        }

        stats.lines_read += 1;
        // Invalid UTF-8 is replaced rather than failing the whole file
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            stats.blank_lines += 1;
            continue;
        }

        let record = match serde_json::from_str::<LogRecord>(line) {
            Ok(record) => record,
            Err(_) => {
                stats.malformed_lines += 1;
                continue;
            }
        };

        if let Some(classified) = classify_record(&record, profile) {
            stats.matched += 1;
            newest.push(NormalizedMessage {
                role: classified.role,
                content: classified.content,
                timestamp: normalize_timestamp(record.timestamp.as_ref()),
                session_id: source.session_id.clone(),
                project_path: source.project_path.clone(),
            });
        }
    }
}

/// Bounded min-heap keeping the `limit` newest messages seen so far.
///
/// Equal timestamps keep the earlier line, so the result matches a stable
/// newest-first sort of every match truncated to `limit`.
struct NewestMessages {
    limit: usize,
    next_seq: u64,
    heap: BinaryHeap<Reverse<Ranked>>,
}

struct Ranked {
    timestamp: Timestamp,
    seq: Reverse<u64>,
    message: NormalizedMessage,
}

impl Ranked {
    fn key(&self) -> (Timestamp, Reverse<u64>) {
        (self.timestamp, self.seq)
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl NewestMessages {
    fn new(limit: usize) -> Self {
        Self { limit, next_seq: 0, heap: BinaryHeap::with_capacity(limit.min(1024) + 1) }
    }

    fn push(&mut self, message: NormalizedMessage) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.limit == 0 {
            return;
        }

        self.heap.push(Reverse(Ranked { timestamp: message.timestamp, seq: Reverse(seq), message }));
        if self.heap.len() > self.limit {
            self.heap.pop();
        }
    }

    fn into_sorted(self) -> Vec<NormalizedMessage> {
        // Ascending order of Reverse<Ranked> is newest first
        self.heap.into_sorted_vec().into_iter().map(|Reverse(ranked)| ranked.message).collect()
    }
}
