//! Edit journal.
//!
//! When enabled in the settings, every applied edit batch, delete and save
//! is appended to `.nugetcfg/journal.ndjson` in the edited document's
//! directory, one JSON object per line.
//!
//! # Entry Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `edit`, `delete` or `save`
//! - `actor`: `user@HOST`
//! - `document`: path of the edited file
//! - `details`: the applied ops, or the issue count for saves
//!
//! Journal failures never block an edit; [`record`] logs them and moves on.

use crate::error::{NugetError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const JOURNAL_DIR: &str = ".nugetcfg";
const JOURNAL_FILE: &str = "journal.ndjson";

/// What happened to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalAction {
    /// A batch of edit ops was applied and written
    Edit,
    /// A confirmed delete was applied and written
    Delete,
    /// The document was saved without changes to the model
    Save,
}

impl std::fmt::Display for JournalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JournalAction::Edit => write!(f, "edit"),
            JournalAction::Delete => write!(f, "delete"),
            JournalAction::Save => write!(f, "save"),
        }
    }
}

/// One journal line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub ts: DateTime<Utc>,
    pub action: JournalAction,
    pub actor: String,
    pub document: String,
    pub details: Value,
}

impl JournalEntry {
    /// Create an entry stamped with the current time and actor.
    pub fn new(action: JournalAction, document: &Path) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            document: document.display().to_string(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize to a single JSON line without the trailing newline.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            NugetError::UserError(format!("failed to serialize journal entry: {}", e))
        })
    }
}

fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Journal file that belongs to `document`.
pub fn journal_path(document: &Path) -> PathBuf {
    let dir = match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    dir.join(JOURNAL_DIR).join(JOURNAL_FILE)
}

/// Append an entry to the journal of `document`, creating it if needed.
///
/// # Returns
///
/// * `Ok(())` - The line was written and synced
/// * `Err(NugetError::IoError)` - The journal could not be created or written
pub fn append_entry(document: &Path, entry: &JournalEntry) -> Result<()> {
    let path = journal_path(document);
    let line = entry.to_ndjson_line()?;

    if let Some(dir) = path.parent()
        && !dir.exists()
    {
        fs::create_dir_all(dir).map_err(|e| {
            NugetError::IoError(format!(
                "failed to create journal directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            NugetError::IoError(format!(
                "failed to open journal '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", line)
        .and_then(|()| file.sync_all())
        .map_err(|e| {
            NugetError::IoError(format!(
                "failed to write journal '{}': {}",
                path.display(),
                e
            ))
        })
}

/// Append an entry, logging instead of failing.
pub fn record(document: &Path, action: JournalAction, details: Value) {
    let entry = JournalEntry::new(action, document).with_details(details);
    if let Err(e) = append_entry(document, &entry) {
        tracing::warn!(error = %e, document = %document.display(), "journal write failed");
    }
}
