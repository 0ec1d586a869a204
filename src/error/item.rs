use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single item inside a batch; never aborts the batch
#[derive(Error, Debug)]
pub enum ItemError {
    #[error("Destination already exists: {}", path.display())]
    Collision { path: PathBuf },

    #[error("Expected file is missing: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("Original path is occupied: {}", path.display())]
    Conflict { path: PathBuf },

    #[error(transparent)]
    Filesystem(#[from] std::io::Error),
}

impl ItemError {
    /// `"<from> -> <to> : <error>"` line for batch summaries
    pub fn describe(&self, from: &std::path::Path, to: &std::path::Path) -> String {
        format!("{} -> {} : {}", from.display(), to.display(), self)
    }
}
