use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scanner::SourceFile;

/// Per-item state, from planning through execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Ok,
    Unchanged,
    WouldCollide,
    RuleError,
    Renamed,
    DryOk,
    Failed,
}

impl ItemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "PENDING",
            ItemStatus::Ok => "OK",
            ItemStatus::Unchanged => "UNCHANGED",
            ItemStatus::WouldCollide => "EXISTS",
            ItemStatus::RuleError => "RULE_ERROR",
            ItemStatus::Renamed => "RENAMED",
            ItemStatus::DryOk => "DRY_OK",
            ItemStatus::Failed => "FAILED",
        }
    }

    /// Statuses that block a clean run when seen in a fresh plan
    pub fn is_problem(&self) -> bool {
        matches!(
            self,
            ItemStatus::WouldCollide | ItemStatus::RuleError | ItemStatus::Failed
        )
    }
}

/// One input file and its computed destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameItem {
    /// Absolute path of the file to rename
    pub source_path: PathBuf,

    /// File name without extension
    pub base_name: String,

    /// Extension with leading dot, or empty
    pub extension: String,

    /// Computed destination; `None` when the rule failed
    pub destination_path: Option<PathBuf>,

    pub status: ItemStatus,

    /// Error text attached to `RuleError` / `Failed` items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RenameItem {
    pub fn new(source: SourceFile) -> Self {
        Self {
            source_path: source.path,
            base_name: source.base_name,
            extension: source.extension,
            destination_path: None,
            status: ItemStatus::Pending,
            message: None,
        }
    }

    /// Full source file name
    pub fn source_name(&self) -> String {
        format!("{}{}", self.base_name, self.extension)
    }

    /// Destination file name, or empty when there is none
    pub fn destination_name(&self) -> String {
        self.destination_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Has a destination that differs from the source
    pub fn is_candidate(&self) -> bool {
        matches!(&self.destination_path, Some(dest) if *dest != self.source_path)
    }

    pub(crate) fn reset(&mut self) {
        self.destination_path = None;
        self.status = ItemStatus::Pending;
        self.message = None;
    }
}

/// Ordered rename plan; item order is input order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenamePlan {
    pub items: Vec<RenameItem>,

    /// Set once the plan has been executed for real
    #[serde(skip)]
    pub(crate) consumed: bool,
}

impl RenamePlan {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|item| item.status == status).count()
    }

    pub fn candidate_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_candidate()).count()
    }

    pub fn has_problems(&self) -> bool {
        self.items.iter().any(|item| item.status.is_problem())
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}
