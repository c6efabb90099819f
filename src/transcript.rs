//! Execution transcript for script runs.
//!
//! Each executed magic is appended to an NDJSON file (one JSON object per
//! line) so a run can be audited or replayed later.
//!
//! # Entry Format
//!
//! - `ts`: RFC3339 timestamp
//! - `magic`: the magic that ran (`render`, `ingest-yaml`, ...)
//! - `status`: `ok`, `diagnostic` or `error`
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `cell`: execution count of the cell
//! - `line`: script line of the magic
//! - `details`: freeform object with magic-specific information

use crate::error::{MagicError, Result};
use crate::magics::Magic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// How a magic invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// The magic completed.
    Ok,
    /// The magic completed but reported a problem (rejected definition).
    Diagnostic,
    /// The magic failed.
    Error,
}

/// One transcript record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub ts: DateTime<Utc>,
    pub magic: String,
    pub status: EntryStatus,
    pub actor: String,
    pub cell: usize,
    pub line: usize,
    pub details: Value,
}

impl TranscriptEntry {
    pub fn new(magic: Magic, status: EntryStatus, cell: usize, line: usize) -> Self {
        Self {
            ts: Utc::now(),
            magic: magic.name().to_string(),
            status,
            actor: get_actor_string(),
            cell,
            line,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the entry to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            MagicError::Io(format!("failed to serialize transcript entry to JSON: {}", e))
        })
    }
}

fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an entry to the transcript at `path`, creating the file if needed.
pub fn append_entry(path: &Path, entry: &TranscriptEntry) -> Result<()> {
    let json_line = entry.to_ndjson_line()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            MagicError::Io(format!(
                "failed to create transcript directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            MagicError::Io(format!(
                "failed to open transcript '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        MagicError::Io(format!(
            "failed to write transcript entry to '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        MagicError::Io(format!(
            "failed to sync transcript '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}
