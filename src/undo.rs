use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ItemError;
use crate::journal::{Journal, JournalEntry, JournalError};
use crate::plan::path_occupied;
use crate::progress::Progress;

#[derive(Debug, thiserror::Error)]
pub enum UndoError {
    #[error("No journal found at {}", .0.display())]
    NoJournal(PathBuf),

    #[error("Journal is empty: {}", .0.display())]
    EmptyJournal(PathBuf),

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoStatus {
    Restored,
    WouldRestore,
    /// The renamed file is no longer where the journal says
    Missing,
    /// Something already occupies the original path
    Conflict,
    Failed,
}

/// One journal entry and what happened when reversing it
#[derive(Debug, Clone, Serialize)]
pub struct UndoOutcome {
    pub entry: JournalEntry,
    pub status: UndoStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of undoing (or previewing) the most recent batch
#[derive(Debug, Clone, Serialize)]
pub struct UndoResult {
    pub batch_timestamp: String,
    pub dry_run: bool,
    pub outcomes: Vec<UndoOutcome>,
    pub restored: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl UndoResult {
    fn new(batch_timestamp: String, dry_run: bool) -> Self {
        Self {
            batch_timestamp,
            dry_run,
            outcomes: Vec::new(),
            restored: 0,
            failed: 0,
            errors: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Newline-joined error list for a single summary message
    pub fn error_summary(&self) -> String {
        self.errors.join("\n")
    }
}

/// Reverses the most recent journaled batch
pub struct UndoEngine<'a> {
    journal: &'a Journal,
}

impl<'a> UndoEngine<'a> {
    pub fn new(journal: &'a Journal) -> Self {
        Self { journal }
    }

    /// Reverse the last batch. The batch leaves the journal before any
    /// reversal is attempted, so failed entries are not retried later.
    pub fn undo_last(&self, progress: &mut Progress) -> Result<UndoResult, UndoError> {
        self.ensure_entries()?;

        let batch = self.journal.pop_last_batch()?;
        let Some(timestamp) = batch.first().map(|e| e.timestamp.clone()) else {
            return Err(UndoError::EmptyJournal(self.journal.path().to_path_buf()));
        };

        info!(timestamp = %timestamp, count = batch.len(), "Undoing batch");
        progress.undo_start(batch.len(), &timestamp);

        let mut result = UndoResult::new(timestamp, false);
        let total = batch.len();

        for (i, entry) in batch.into_iter().enumerate() {
            progress.undo_progress(
                i + 1,
                total,
                &display_name(&entry.new_path),
                &display_name(&entry.old_path),
            );

            let outcome = match check_reversible(&entry) {
                Err(err) => failed_outcome(&mut result, progress, entry, err),
                Ok(()) => match fs::rename(&entry.new_path, &entry.old_path) {
                    Ok(()) => {
                        info!(from = ?entry.new_path, to = ?entry.old_path, "Restored");
                        result.restored += 1;
                        UndoOutcome {
                            entry,
                            status: UndoStatus::Restored,
                            message: None,
                        }
                    }
                    Err(e) => failed_outcome(&mut result, progress, entry, ItemError::from(e)),
                },
            };

            result.outcomes.push(outcome);
        }

        info!(
            restored = result.restored,
            failed = result.failed,
            "Undo complete"
        );

        Ok(result)
    }

    /// Check what `undo_last` would do without touching the filesystem or
    /// the journal
    pub fn preview_last(&self) -> Result<UndoResult, UndoError> {
        self.ensure_entries()?;

        let batch = self.journal.last_batch()?;
        let timestamp = batch
            .first()
            .map(|e| e.timestamp.clone())
            .unwrap_or_default();

        let mut result = UndoResult::new(timestamp, true);

        for entry in batch {
            match check_reversible(&entry) {
                Ok(()) => {
                    result.restored += 1;
                    result.outcomes.push(UndoOutcome {
                        entry,
                        status: UndoStatus::WouldRestore,
                        message: None,
                    });
                }
                Err(err) => {
                    let outcome = failed_outcome(&mut result, &mut Progress::silent(), entry, err);
                    result.outcomes.push(outcome);
                }
            }
        }

        debug!(
            would_restore = result.restored,
            blocked = result.failed,
            "Undo preview"
        );

        Ok(result)
    }

    fn ensure_entries(&self) -> Result<(), UndoError> {
        if !self.journal.exists() {
            return Err(UndoError::NoJournal(self.journal.path().to_path_buf()));
        }
        if self.journal.read_all()?.is_empty() {
            return Err(UndoError::EmptyJournal(self.journal.path().to_path_buf()));
        }
        Ok(())
    }
}

/// The renamed file must still exist and its original path must be free
fn check_reversible(entry: &JournalEntry) -> Result<(), ItemError> {
    if !path_occupied(&entry.new_path) {
        return Err(ItemError::MissingSource {
            path: entry.new_path.clone(),
        });
    }
    if path_occupied(&entry.old_path) {
        return Err(ItemError::Conflict {
            path: entry.old_path.clone(),
        });
    }
    Ok(())
}

fn failed_outcome(
    result: &mut UndoResult,
    progress: &mut Progress,
    entry: JournalEntry,
    err: ItemError,
) -> UndoOutcome {
    let status = match err {
        ItemError::MissingSource { .. } => UndoStatus::Missing,
        ItemError::Conflict { .. } => UndoStatus::Conflict,
        _ => UndoStatus::Failed,
    };
    let line = err.describe(&entry.new_path, &entry.old_path);
    warn!("{}", line);
    progress.warn(&line);

    result.failed += 1;
    result.errors.push(line);

    UndoOutcome {
        entry,
        status,
        message: Some(err.to_string()),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
