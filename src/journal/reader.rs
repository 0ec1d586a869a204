use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::*;
use super::writer::JournalError;

/// Read every entry of a journal file, oldest first
pub fn read_entries(path: &Path) -> Result<Vec<JournalEntry>, JournalError> {
    let file = File::open(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let header = reader.headers()?.clone();

    // A zero-byte file is a journal with nothing in it
    if header.is_empty() {
        return Ok(Vec::new());
    }

    let fields: Vec<&str> = header.iter().collect();
    if fields != JOURNAL_HEADER && fields != LEGACY_JOURNAL_HEADER {
        return Err(JournalError::InvalidHeader {
            found: fields.join(","),
        });
    }

    let mut entries = Vec::new();

    for record in reader.records() {
        let record = record?;

        if record.len() < 3 {
            return Err(JournalError::MalformedRow {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                fields: record.len(),
            });
        }

        entries.push(JournalEntry::new(
            &record[0],
            PathBuf::from(&record[1]),
            PathBuf::from(&record[2]),
        ));
    }

    debug!(path = ?path, count = entries.len(), "Read journal");

    Ok(entries)
}
