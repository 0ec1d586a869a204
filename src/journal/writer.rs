use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::*;

/// Error types for journal operations
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("Journal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Journal CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unrecognized journal header: {found}")]
    InvalidHeader { found: String },

    #[error("Malformed journal row at line {line}: expected 3 fields, found {fields}")]
    MalformedRow { line: u64, fields: usize },

    #[error("Path is not valid UTF-8 and cannot be journaled: {0}")]
    NonUtf8Path(PathBuf),
}

/// Append entries, writing the header first when the file is new or empty
pub fn append_entries(path: &Path, entries: &[JournalEntry]) -> Result<(), JournalError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let rows = text_rows(entries)?;
    let write_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    write_records(&file, &rows, write_header)?;

    debug!(path = ?path, count = entries.len(), "Appended journal entries");

    Ok(())
}

/// Replace the journal contents through a temporary sibling file
pub fn rewrite_entries(path: &Path, entries: &[JournalEntry]) -> Result<(), JournalError> {
    let rows = text_rows(entries)?;
    let temp_path = temp_path_for(path);

    {
        let file = File::create(&temp_path)?;
        write_records(&file, &rows, true)?;
    }

    // Atomic rename
    fs::rename(&temp_path, path)?;

    info!(path = ?path, remaining = entries.len(), "Journal rewritten");

    Ok(())
}

/// Borrow every entry as text up front so nothing is written when a path
/// cannot be stored exactly
fn text_rows(entries: &[JournalEntry]) -> Result<Vec<[&str; 3]>, JournalError> {
    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        rows.push([
            entry.timestamp.as_str(),
            path_text(&entry.old_path)?,
            path_text(&entry.new_path)?,
        ]);
    }
    Ok(rows)
}

fn path_text(path: &Path) -> Result<&str, JournalError> {
    path.to_str()
        .ok_or_else(|| JournalError::NonUtf8Path(path.to_path_buf()))
}

/// Write rows and sync them to disk before returning
fn write_records(file: &File, rows: &[[&str; 3]], write_header: bool) -> Result<(), JournalError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);

    if write_header {
        csv.write_record(JOURNAL_HEADER)?;
    }

    for row in rows {
        csv.write_record(row)?;
    }

    csv.flush()?;
    file.sync_all()?;

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
