//! JSON-file chat history persistence.
//!
//! One record per file, named by the history id. Reads fail soft: a corrupt
//! or missing record yields an empty result rather than an error, so the UI
//! never loses the running conversation over a bad file.

pub mod title;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use crate::llm::{Message, ModelId};

/// A persisted snapshot of one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub timestamp: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelId>,
    #[serde(default = "untitled")]
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

fn untitled() -> String {
    "Untitled Chat".to_string()
}

/// Directory-backed store of history records.
#[derive(Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// History ids are derived from the creation time at second resolution.
    /// Two saves within the same second produce the same id and the later
    /// write wins; this collision window is accepted for a single-user tool.
    fn generate_id(now: DateTime<Local>) -> String {
        format!("chat_{}", now.format("%Y%m%d_%H%M%S"))
    }

    fn record_path(&self, id: &str) -> Option<PathBuf> {
        // Ids come from URLs; anything that could escape the directory is
        // treated as not found.
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return None;
        }
        Some(self.dir.join(format!("{id}.json")))
    }

    /// Persist a conversation log. Returns `None` without writing anything
    /// when the log is empty. Repeated saves are not deduplicated.
    pub async fn save(
        &self,
        messages: &[Message],
        model: Option<ModelId>,
    ) -> Result<Option<String>, HistoryError> {
        if messages.is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(&self.dir).await?;

        let now = Local::now();
        let record = HistoryRecord {
            id: Self::generate_id(now),
            timestamp: now,
            model,
            title: title::generate_title(messages),
            messages: messages.to_vec(),
        };

        let path = self.dir.join(format!("{}.json", record.id));
        let contents = serde_json::to_vec_pretty(&record)?;
        fs::write(&path, contents).await?;

        debug!(id = record.id, path = %path.display(), "saved chat history");
        Ok(Some(record.id))
    }

    /// List saved histories as (id, title), most recent id first. Unreadable
    /// records are skipped with a warning, never fatal.
    pub async fn list(&self) -> Vec<(String, String)> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut histories = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_record(&path).await {
                Ok(record) => histories.push((record.id, record.title)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable history");
                }
            }
        }

        // Ids embed the creation timestamp, so lexical descending order is
        // newest first.
        histories.sort_by(|a, b| b.0.cmp(&a.0));
        histories
    }

    /// Load one history. Missing file, malformed content, and unknown ids
    /// all yield an empty log and no model; callers detect failure by the
    /// emptiness of the result.
    pub async fn load(&self, id: &str) -> (Vec<Message>, Option<ModelId>) {
        let Some(path) = self.record_path(id) else {
            return (Vec::new(), None);
        };

        match read_record(&path).await {
            Ok(record) => {
                debug!(id, count = record.messages.len(), "loaded chat history");
                (record.messages, record.model)
            }
            Err(e) => {
                warn!(id, error = %e, "failed to load chat history");
                (Vec::new(), None)
            }
        }
    }

    /// Delete one history. Returns false when the record does not exist or
    /// the removal fails; never errors out.
    pub async fn delete(&self, id: &str) -> bool {
        let Some(path) = self.record_path(id) else {
            return false;
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(id, "deleted chat history");
                true
            }
            Err(e) => {
                warn!(id, error = %e, "failed to delete chat history");
                false
            }
        }
    }
}

async fn read_record(path: &Path) -> Result<HistoryRecord, HistoryError> {
    let contents = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("history record is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
