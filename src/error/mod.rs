mod codes;
mod item;

pub use codes::ExitCode;
pub use item::ItemError;

use crate::executor::ExecuteError;
use crate::journal::JournalError;
use crate::rule::ConfigError;
use crate::scanner::ScannerError;
use crate::undo::UndoError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Path is not a file: {path}")]
    NotAFile { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Unsupported file name: {path}")]
    UnsupportedName { path: PathBuf },

    #[error("Invalid rule: {message}")]
    InvalidRule { message: String },

    #[error("Plan has {count} problem items")]
    PlanConflicts { count: usize },

    #[error("{failed} of {total} items failed")]
    PartialFailure {
        failed: usize,
        total: usize,
        errors: Vec<String>,
    },

    #[error("Journal error: {message}")]
    JournalError {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("No journal found: {path}")]
    NoJournal { path: PathBuf },

    #[error("Journal is empty: {path}")]
    EmptyJournal { path: PathBuf },

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::SourceNotFound { .. } => ExitCode::SourceNotFound,
            AppError::NotAFile { .. } => ExitCode::SourceNotFound,
            AppError::PermissionDenied { .. } => ExitCode::SourceNotFound,
            AppError::UnsupportedName { .. } => ExitCode::InvalidArguments,
            AppError::InvalidRule { .. } => ExitCode::InvalidArguments,
            AppError::PlanConflicts { .. } => ExitCode::PlanConflicts,
            AppError::PartialFailure { .. } => ExitCode::PartialFailure,
            AppError::JournalError { .. } => ExitCode::JournalError,
            AppError::NoJournal { .. } => ExitCode::NoJournal,
            AppError::EmptyJournal { .. } => ExitCode::EmptyJournal,
            AppError::Other(_) => ExitCode::GeneralError,
        }
    }

    pub fn detailed_message(&self) -> String {
        match self {
            AppError::SourceNotFound { path } => {
                format!(
                    "The specified file does not exist:\n  {}\n\n\
                     Please verify the path and try again.",
                    path.display()
                )
            }

            AppError::NotAFile { path } => {
                format!(
                    "The specified path is not a regular file:\n  {}\n\n\
                     Directories are not renamed or walked; pass files only.",
                    path.display()
                )
            }

            AppError::PermissionDenied { path } => {
                format!(
                    "Permission denied when accessing:\n  {}\n\n\
                     Please check file permissions.",
                    path.display()
                )
            }

            AppError::UnsupportedName { path } => {
                format!(
                    "The file name is not valid UTF-8:\n  {}\n\n\
                     Such files cannot be renamed or recorded for undo.",
                    path.display()
                )
            }

            AppError::InvalidRule { message } => {
                format!("Invalid naming rule: {}", message)
            }

            AppError::PlanConflicts { count } => {
                format!(
                    "{} item(s) cannot be renamed as planned.\n\
                     Items marked EXISTS would overwrite an existing file;\n\
                     items marked RULE_ERROR could not be named by the rule.",
                    count
                )
            }

            AppError::PartialFailure {
                failed,
                total,
                errors,
            } => {
                let mut msg = format!("{} of {} item(s) failed:\n", failed, total);
                msg.push_str(&errors.join("\n"));
                msg
            }

            AppError::JournalError { path, message } => {
                let path_info = path
                    .as_ref()
                    .map(|p| format!("File: {}\n", p.display()))
                    .unwrap_or_default();

                format!(
                    "Journal error:\n  {}\n{}\n\
                     Ensure the journal is a CSV file with header \
                     'timestamp,old_path,new_path'.",
                    message, path_info
                )
            }

            AppError::NoJournal { path } => {
                format!(
                    "No undo journal found at:\n  {}\n\n\
                     Nothing has been renamed yet, or a different journal is configured.",
                    path.display()
                )
            }

            AppError::EmptyJournal { path } => {
                format!(
                    "The undo journal is empty:\n  {}\n\n\
                     There is no batch left to undo.",
                    path.display()
                )
            }

            AppError::Other(message) => message.clone(),
        }
    }
}

impl From<ScannerError> for AppError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::PathNotFound(path) => AppError::SourceNotFound { path },
            ScannerError::NotAFile(path) => AppError::NotAFile { path },
            ScannerError::PermissionDenied(path) => AppError::PermissionDenied { path },
            ScannerError::NonUtf8Path(path) => AppError::UnsupportedName { path },
            ScannerError::IoError(e) => AppError::Other(format!("I/O error: {}", e)),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::InvalidRule {
            message: err.to_string(),
        }
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        AppError::JournalError {
            path: None,
            message: err.to_string(),
        }
    }
}

impl From<ExecuteError> for AppError {
    fn from(err: ExecuteError) -> Self {
        AppError::Other(err.to_string())
    }
}

impl From<UndoError> for AppError {
    fn from(err: UndoError) -> Self {
        match err {
            UndoError::NoJournal(path) => AppError::NoJournal { path },
            UndoError::EmptyJournal(path) => AppError::EmptyJournal { path },
            UndoError::Journal(e) => e.into(),
        }
    }
}
