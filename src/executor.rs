use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::ItemError;
use crate::journal::{batch_timestamp, Journal, JournalEntry};
use crate::plan::{path_occupied, ItemStatus, RenameItem, RenamePlan};
use crate::progress::Progress;

#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error("Plan was already executed; rebuild it before running again")]
    StalePlan,
}

/// What happened to one plan item
#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    pub source_path: PathBuf,
    pub destination_path: Option<PathBuf>,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&RenameItem> for ItemOutcome {
    fn from(item: &RenameItem) -> Self {
        Self {
            source_path: item.source_path.clone(),
            destination_path: item.destination_path.clone(),
            status: item.status,
            message: item.message.clone(),
        }
    }
}

/// Outcome of one `execute` call
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub dry_run: bool,
    /// Timestamp the batch was journaled under, if anything was journaled
    pub batch_timestamp: Option<String>,
    pub outcomes: Vec<ItemOutcome>,
    pub renamed: usize,
    pub dry_ok: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Skipped items the rule could not name; also listed in `errors`
    pub rule_errors: usize,
    pub errors: Vec<String>,
    /// Entries recorded for this batch (empty for dry runs)
    pub journal_entries: Vec<JournalEntry>,
    /// Set when renames happened but the journal could not be written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_error: Option<String>,
}

impl ExecutionResult {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            batch_timestamp: None,
            outcomes: Vec::new(),
            renamed: 0,
            dry_ok: 0,
            failed: 0,
            skipped: 0,
            rule_errors: 0,
            errors: Vec::new(),
            journal_entries: Vec::new(),
            journal_error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.rule_errors == 0 && self.journal_error.is_none()
    }

    /// Newline-joined error list for a single summary message
    pub fn error_summary(&self) -> String {
        self.errors.join("\n")
    }
}

/// Carries out rename plans and journals what changed
pub struct Executor<'a> {
    journal: &'a Journal,
}

impl<'a> Executor<'a> {
    pub fn new(journal: &'a Journal) -> Self {
        Self { journal }
    }

    /// Execute a plan. Items without a distinct destination are skipped;
    /// every other item is attempted independently of the rest.
    pub fn execute(
        &self,
        plan: &mut RenamePlan,
        dry_run: bool,
        progress: &mut Progress,
    ) -> Result<ExecutionResult, ExecuteError> {
        if plan.is_consumed() {
            return Err(ExecuteError::StalePlan);
        }

        let timestamp = batch_timestamp(Utc::now());
        let total = plan.candidate_count();
        let mut result = ExecutionResult::new(dry_run);
        let mut current = 0;

        info!(total, dry_run, "Executing plan");
        progress.rename_start(total, dry_run);

        for item in &mut plan.items {
            let destination = match &item.destination_path {
                Some(dest) if item.is_candidate() => dest.clone(),
                _ => {
                    debug!(source = ?item.source_path, status = ?item.status, "Skipping item");
                    if item.status == ItemStatus::RuleError {
                        let line = format!(
                            "{} : {}",
                            item.source_path.display(),
                            item.message.as_deref().unwrap_or("rule failed")
                        );
                        warn!("{}", line);
                        progress.warn(&line);
                        result.rule_errors += 1;
                        result.errors.push(line);
                    }
                    result.skipped += 1;
                    result.outcomes.push(ItemOutcome::from(&*item));
                    continue;
                }
            };

            current += 1;
            progress.rename_progress(
                current,
                total,
                &item.source_name(),
                &item.destination_name(),
            );

            match rename_one(&item.source_path, &destination, dry_run) {
                Ok(()) if dry_run => {
                    item.status = ItemStatus::DryOk;
                    result.dry_ok += 1;
                }
                Ok(()) => {
                    info!(from = ?item.source_path, to = ?destination, "Renamed");
                    item.status = ItemStatus::Renamed;
                    result.renamed += 1;
                    result.journal_entries.push(JournalEntry::new(
                        timestamp.as_str(),
                        item.source_path.clone(),
                        destination.clone(),
                    ));
                }
                Err(err) => {
                    let line = err.describe(&item.source_path, &destination);
                    warn!("{}", line);
                    progress.warn(&line);
                    item.status = ItemStatus::Failed;
                    item.message = Some(err.to_string());
                    result.failed += 1;
                    result.errors.push(line);
                }
            }

            result.outcomes.push(ItemOutcome::from(&*item));
        }

        if !dry_run {
            plan.consumed = true;
        }

        if !result.journal_entries.is_empty() {
            match self.journal.append(&result.journal_entries) {
                Ok(()) => {
                    progress.journal_written(self.journal.path(), result.journal_entries.len());
                    result.batch_timestamp = Some(timestamp);
                }
                Err(e) => {
                    error!(path = ?self.journal.path(), error = %e, "Failed to write journal");
                    let line = format!("journal {} : {}", self.journal.path().display(), e);
                    progress.warn(&line);
                    result.errors.push(line);
                    result.journal_error = Some(e.to_string());
                }
            }
        }

        info!(
            renamed = result.renamed,
            dry_ok = result.dry_ok,
            failed = result.failed,
            skipped = result.skipped,
            rule_errors = result.rule_errors,
            "Execution complete"
        );

        Ok(result)
    }
}

/// Re-check the destination, then rename unless this is a dry run
fn rename_one(
    source: &std::path::Path,
    destination: &std::path::Path,
    dry_run: bool,
) -> Result<(), ItemError> {
    if destination != source && path_occupied(destination) {
        return Err(ItemError::Collision {
            path: destination.to_path_buf(),
        });
    }

    if dry_run {
        return Ok(());
    }

    fs::rename(source, destination)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanBuilder;
    use crate::rule::NameRuleConfig;
    use crate::scanner::SourceFile;
    use std::path::Path;
    use tempfile::tempdir;

    fn setup(dir: &Path, names: &[&str], base: &str) -> (RenamePlan, Journal) {
        let sources: Vec<SourceFile> = names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, name).unwrap();
                SourceFile::from_path(path)
            })
            .collect();

        let config = NameRuleConfig {
            base_name: base.to_string(),
            ..Default::default()
        };
        let plan = PlanBuilder::new(&config).build(&sources);
        let journal = Journal::new(dir.join("journal.csv"));

        (plan, journal)
    }

    #[test]
    fn test_execute_renames_and_journals() {
        let dir = tempdir().unwrap();
        let (mut plan, journal) = setup(dir.path(), &["a.png", "b.png"], "img");

        let result = Executor::new(&journal)
            .execute(&mut plan, false, &mut Progress::silent())
            .unwrap();

        assert_eq!(result.renamed, 2);
        assert!(result.is_success());
        assert!(dir.path().join("img_001.png").exists());
        assert!(dir.path().join("img_002.png").exists());
        assert!(!dir.path().join("a.png").exists());
        assert_eq!(plan.count(ItemStatus::Renamed), 2);

        let entries = journal.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].timestamp, entries[1].timestamp);
        assert_eq!(result.batch_timestamp.as_deref(), Some(entries[0].timestamp.as_str()));
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempdir().unwrap();
        let (mut plan, journal) = setup(dir.path(), &["a.png"], "img");

        let result = Executor::new(&journal)
            .execute(&mut plan, true, &mut Progress::silent())
            .unwrap();

        assert_eq!(result.dry_ok, 1);
        assert_eq!(result.renamed, 0);
        assert!(result.journal_entries.is_empty());
        assert!(dir.path().join("a.png").exists());
        assert!(!dir.path().join("img_001.png").exists());
        assert!(!journal.exists());
        assert_eq!(plan.items[0].status, ItemStatus::DryOk);
        assert!(!plan.is_consumed());
    }

    #[test]
    fn test_collision_fails_item_only() {
        let dir = tempdir().unwrap();
        let (mut plan, journal) = setup(dir.path(), &["a.png", "b.png"], "img");
        // Destination appears between planning and execution
        fs::write(dir.path().join("img_001.png"), "intruder").unwrap();

        let result = Executor::new(&journal)
            .execute(&mut plan, false, &mut Progress::silent())
            .unwrap();

        assert_eq!(result.failed, 1);
        assert_eq!(result.renamed, 1);
        assert!(!result.is_success());
        assert!(result.errors[0].contains("Destination already exists"));
        assert_eq!(plan.items[0].status, ItemStatus::Failed);
        assert_eq!(
            fs::read_to_string(dir.path().join("img_001.png")).unwrap(),
            "intruder"
        );
        assert!(dir.path().join("a.png").exists());
        assert_eq!(journal.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_unchanged_items_are_skipped() {
        let dir = tempdir().unwrap();
        let (mut plan, journal) = setup(dir.path(), &["a.png"], "");

        let result = Executor::new(&journal)
            .execute(&mut plan, false, &mut Progress::silent())
            .unwrap();

        assert_eq!(result.skipped, 1);
        assert_eq!(result.renamed + result.failed, 0);
        assert_eq!(result.outcomes[0].status, ItemStatus::Unchanged);
        assert!(!journal.exists());
    }

    #[test]
    fn test_rule_errors_are_reported_not_failed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.png"), "a").unwrap();
        let sources = vec![SourceFile::from_path(dir.path().join("a.png"))];
        let config = NameRuleConfig {
            find_text: "[".to_string(),
            use_regex: true,
            ..Default::default()
        };
        let mut plan = PlanBuilder::new(&config).build(&sources);
        let journal = Journal::new(dir.path().join("journal.csv"));

        let result = Executor::new(&journal)
            .execute(&mut plan, false, &mut Progress::silent())
            .unwrap();

        assert_eq!(result.skipped, 1);
        assert_eq!(result.rule_errors, 1);
        assert_eq!(result.failed, 0);
        assert!(!result.is_success());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("a.png : Invalid pattern"));
        assert!(dir.path().join("a.png").exists());
        assert!(!journal.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_blocks_rename() {
        let dir = tempdir().unwrap();
        let (mut plan, journal) = setup(dir.path(), &["a.png"], "img");
        // Appears after planning and points nowhere
        std::os::unix::fs::symlink("missing", dir.path().join("img_001.png")).unwrap();

        let result = Executor::new(&journal)
            .execute(&mut plan, false, &mut Progress::silent())
            .unwrap();

        assert_eq!(result.failed, 1);
        assert!(result.errors[0].contains("Destination already exists"));
        assert!(dir.path().join("a.png").exists());
        assert!(fs::symlink_metadata(dir.path().join("img_001.png"))
            .unwrap()
            .file_type()
            .is_symlink());
        assert!(!journal.exists());
    }

    #[test]
    fn test_filesystem_error_is_captured() {
        let dir = tempdir().unwrap();
        let (mut plan, journal) = setup(dir.path(), &["a.png", "b.png"], "img");
        // Source vanishes after planning
        fs::remove_file(dir.path().join("a.png")).unwrap();

        let result = Executor::new(&journal)
            .execute(&mut plan, false, &mut Progress::silent())
            .unwrap();

        assert_eq!(result.failed, 1);
        assert_eq!(result.renamed, 1);
        assert!(result.errors[0].contains("a.png -> "));
    }

    #[test]
    fn test_executed_plan_is_stale() {
        let dir = tempdir().unwrap();
        let (mut plan, journal) = setup(dir.path(), &["a.png"], "img");
        let executor = Executor::new(&journal);

        executor
            .execute(&mut plan, false, &mut Progress::silent())
            .unwrap();
        let again = executor.execute(&mut plan, false, &mut Progress::silent());

        assert!(matches!(again, Err(ExecuteError::StalePlan)));
    }

    #[test]
    fn test_journal_failure_is_reported() {
        let dir = tempdir().unwrap();
        let (mut plan, _) = setup(dir.path(), &["a.png"], "img");
        // A directory where the journal file should be
        let blocked = dir.path().join("blocked");
        fs::create_dir(&blocked).unwrap();
        let journal = Journal::new(&blocked);

        let result = Executor::new(&journal)
            .execute(&mut plan, false, &mut Progress::silent())
            .unwrap();

        assert_eq!(result.renamed, 1);
        assert!(result.journal_error.is_some());
        assert!(result.batch_timestamp.is_none());
        assert!(!result.is_success());
    }
}
