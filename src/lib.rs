pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod journal;
pub mod logging;
pub mod output;
pub mod plan;
pub mod progress;
pub mod rule;
pub mod scanner;
pub mod undo;

pub use error::{AppError, ExitCode, ItemError};
pub use executor::{ExecuteError, ExecutionResult, Executor, ItemOutcome};
pub use journal::{BatchSummary, Journal, JournalEntry, JournalError};
pub use plan::{ItemStatus, PlanBuilder, RenameItem, RenamePlan};
pub use progress::Progress;
pub use rule::{NameRule, NameRuleConfig, RuleError};
pub use scanner::{collect_sources, ScannerError, SourceFile};
pub use undo::{UndoEngine, UndoError, UndoOutcome, UndoResult, UndoStatus};
