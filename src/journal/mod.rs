//! Append-only record of successful renames, grouped into batches by
//! timestamp. The only mutation besides appending is dropping the most
//! recent batch.

mod reader;
mod types;
mod writer;

pub use reader::read_entries;
pub use types::*;
pub use writer::{append_entries, rewrite_entries, JournalError};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Journal stored as CSV at a fixed location
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Durably append entries in one write; no-op for an empty slice
    pub fn append(&self, entries: &[JournalEntry]) -> Result<(), JournalError> {
        if entries.is_empty() {
            return Ok(());
        }
        append_entries(&self.path, entries)?;
        info!(path = ?self.path, count = entries.len(), "Journal updated");
        Ok(())
    }

    /// All entries, oldest first. A missing journal reads as empty.
    pub fn read_all(&self) -> Result<Vec<JournalEntry>, JournalError> {
        if !self.exists() {
            return Ok(Vec::new());
        }
        read_entries(&self.path)
    }

    /// Entries of the most recent batch without modifying the journal,
    /// most recent first
    pub fn last_batch(&self) -> Result<Vec<JournalEntry>, JournalError> {
        let entries = self.read_all()?;
        let Some(timestamp) = entries.last().map(|e| e.timestamp.clone()) else {
            return Ok(Vec::new());
        };

        Ok(entries
            .into_iter()
            .rev()
            .filter(|e| e.timestamp == timestamp)
            .collect())
    }

    /// Remove the most recent batch and return its entries, most recent first.
    ///
    /// The journal is rewritten before returning, whatever the caller later
    /// manages to do with the entries.
    pub fn pop_last_batch(&self) -> Result<Vec<JournalEntry>, JournalError> {
        let entries = self.read_all()?;
        let Some(timestamp) = entries.last().map(|e| e.timestamp.clone()) else {
            return Ok(Vec::new());
        };

        let (batch, remaining): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|e| e.timestamp == timestamp);

        rewrite_entries(&self.path, &remaining)?;

        debug!(
            timestamp = %timestamp,
            popped = batch.len(),
            remaining = remaining.len(),
            "Popped last batch"
        );

        Ok(batch.into_iter().rev().collect())
    }

    /// Batches in append order
    pub fn batches(&self) -> Result<Vec<BatchSummary>, JournalError> {
        let mut batches: Vec<BatchSummary> = Vec::new();

        for entry in self.read_all()? {
            match batches.iter_mut().find(|b| b.timestamp == entry.timestamp) {
                Some(batch) => batch.count += 1,
                None => batches.push(BatchSummary {
                    timestamp: entry.timestamp,
                    count: 1,
                }),
            }
        }

        Ok(batches)
    }
}
