mod types;

pub use types::*;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::rule::{NameRule, NameRuleConfig, RuleError};
use crate::scanner::SourceFile;

/// Computes rename plans from a source list and a rule.
///
/// Holds no state between builds: every call recomputes from scratch.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    rule: NameRule,
    start_index: u64,
}

impl PlanBuilder {
    pub fn new(config: &NameRuleConfig) -> Self {
        Self {
            rule: NameRule::new(config),
            start_index: u64::from(config.start_index),
        }
    }

    /// Build a fresh plan, one item per source in input order
    pub fn build(&self, sources: &[SourceFile]) -> RenamePlan {
        let mut plan = RenamePlan {
            items: sources.iter().cloned().map(RenameItem::new).collect(),
            consumed: false,
        };
        self.refresh(&mut plan);
        plan
    }

    /// Recompute every item of an existing plan in place
    pub fn refresh(&self, plan: &mut RenamePlan) {
        let mut index = self.start_index;

        for item in &mut plan.items {
            item.reset();

            // A lossy name would never match the file on disk
            if item.source_path.to_str().is_none() {
                debug!(source = ?item.source_path, "Skipping non UTF-8 source");
                item.status = ItemStatus::RuleError;
                item.message = Some(RuleError::NonUtf8Name.to_string());
                continue;
            }

            let name = item.source_name();
            match self.rule.apply(&name, &item.extension, index) {
                Ok(new_name) => {
                    if self.rule.uses_index() {
                        index += 1;
                    }
                    let destination = destination_for(&item.source_path, &new_name);
                    item.status = classify(&item.source_path, &destination);
                    item.destination_path = Some(destination);
                }
                Err(err) => {
                    let consumed = match err {
                        RuleError::InvalidPattern(_) => self.rule.error_consumes_index(),
                        // Failure after the template step: the number was used
                        _ => true,
                    };
                    if consumed && self.rule.uses_index() {
                        index += 1;
                    }
                    debug!(source = %name, error = %err, "Rule failed for item");
                    item.status = ItemStatus::RuleError;
                    item.message = Some(err.to_string());
                }
            }
        }

        plan.consumed = false;

        info!(
            total = plan.len(),
            ok = plan.count(ItemStatus::Ok),
            unchanged = plan.count(ItemStatus::Unchanged),
            collisions = plan.count(ItemStatus::WouldCollide),
            errors = plan.count(ItemStatus::RuleError),
            "Plan built"
        );
    }
}

/// Destination in the same directory as the source
pub fn destination_for(source: &Path, new_name: &str) -> PathBuf {
    source
        .parent()
        .map(|p| p.join(new_name))
        .unwrap_or_else(|| PathBuf::from(new_name))
}

/// Something (file, directory or dangling symlink) sits at `path`
pub fn path_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn classify(source: &Path, destination: &Path) -> ItemStatus {
    if destination == source {
        ItemStatus::Unchanged
    } else if path_occupied(destination) {
        ItemStatus::WouldCollide
    } else {
        ItemStatus::Ok
    }
}
