use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Header written at the top of every journal file
pub const JOURNAL_HEADER: [&str; 3] = ["timestamp", "old_path", "new_path"];

/// Short header used by older journals; columns mean the same thing
pub const LEGACY_JOURNAL_HEADER: [&str; 3] = ["ts", "old", "new"];

/// One successful rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Batch timestamp shared by every entry of one execution
    pub timestamp: String,

    /// Path before the rename
    pub old_path: PathBuf,

    /// Path after the rename
    pub new_path: PathBuf,
}

impl JournalEntry {
    pub fn new(timestamp: impl Into<String>, old_path: PathBuf, new_path: PathBuf) -> Self {
        Self {
            timestamp: timestamp.into(),
            old_path,
            new_path,
        }
    }
}

/// Entries grouped under one timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub timestamp: String,
    pub count: usize,
}

/// Timestamp for a new batch, e.g. `2026-01-15T10:30:45.123456Z`
pub fn batch_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
