use crate::executor::ExecutionResult;
use crate::journal::BatchSummary;
use crate::plan::{ItemStatus, RenamePlan};
use crate::undo::{UndoResult, UndoStatus};
use std::io::{self, Write};

/// Display a plan as a preview table
pub fn display_plan(plan: &RenamePlan, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "========================================")?;
    writeln!(writer, "              PREVIEW")?;
    writeln!(writer, "========================================")?;
    writeln!(writer)?;

    if plan.is_empty() {
        writeln!(writer, "No files to rename.")?;
        return Ok(());
    }

    for (i, item) in plan.items.iter().enumerate() {
        writeln!(writer, "  {}. [{}]", i + 1, item.status.label())?;
        writeln!(writer, "     From: {}", item.source_path.display())?;
        match &item.destination_path {
            Some(dest) => writeln!(writer, "     To:   {}", dest.display())?,
            None => writeln!(writer, "     To:   -")?,
        }
        if let Some(message) = &item.message {
            writeln!(writer, "     [!] {}", message)?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "----------------------------------------")?;
    writeln!(writer, "Summary:")?;
    writeln!(writer, "  {} would be renamed", plan.count(ItemStatus::Ok))?;
    writeln!(writer, "  {} unchanged", plan.count(ItemStatus::Unchanged))?;

    let collisions = plan.count(ItemStatus::WouldCollide);
    if collisions > 0 {
        writeln!(writer, "  {} destination(s) already exist", collisions)?;
    }

    let errors = plan.count(ItemStatus::RuleError);
    if errors > 0 {
        writeln!(writer, "  {} rule error(s)", errors)?;
    }

    Ok(())
}

/// Display a plan as JSON for non-terminal front-ends
pub fn display_plan_json(plan: &RenamePlan, writer: &mut impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, plan)?;
    writeln!(writer)
}

/// Display execution results
pub fn display_execution_result(result: &ExecutionResult, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;

    if result.dry_run {
        writeln!(writer, "Dry run: no files were changed.")?;
        writeln!(writer, "  {} file(s) would be renamed", result.dry_ok)?;
    } else {
        writeln!(writer, "Renamed {} file(s).", result.renamed)?;
        if let Some(timestamp) = &result.batch_timestamp {
            writeln!(writer, "  Batch: {}", timestamp)?;
        }
    }

    if result.skipped > 0 {
        writeln!(writer, "  {} skipped", result.skipped)?;
    }

    if result.failed > 0 {
        writeln!(writer, "  {} failed", result.failed)?;
    }

    if result.rule_errors > 0 {
        writeln!(writer, "  {} rule error(s)", result.rule_errors)?;
    }

    Ok(())
}

/// Display undo (or undo preview) results
pub fn display_undo_result(result: &UndoResult, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;

    if result.dry_run {
        writeln!(writer, "Undo preview for batch {}:", result.batch_timestamp)?;
        for outcome in &result.outcomes {
            let marker = match outcome.status {
                UndoStatus::WouldRestore => "ok",
                UndoStatus::Missing => "missing",
                UndoStatus::Conflict => "conflict",
                UndoStatus::Restored | UndoStatus::Failed => "-",
            };
            writeln!(
                writer,
                "  [{}] {} -> {}",
                marker,
                outcome.entry.new_path.display(),
                outcome.entry.old_path.display()
            )?;
        }
        writeln!(writer)?;
        writeln!(
            writer,
            "{} file(s) would be restored, {} blocked.",
            result.restored, result.failed
        )?;
        return Ok(());
    }

    writeln!(
        writer,
        "Restored {} file(s) from batch {}.",
        result.restored, result.batch_timestamp
    )?;

    if result.failed > 0 {
        writeln!(writer, "  {} could not be restored", result.failed)?;
    }

    Ok(())
}

/// Display journal batches, oldest first
pub fn display_history(batches: &[BatchSummary], writer: &mut impl Write) -> io::Result<()> {
    if batches.is_empty() {
        writeln!(writer, "Journal is empty.")?;
        return Ok(());
    }

    for batch in batches {
        writeln!(writer, "{}\t{} file(s)", batch.timestamp, batch.count)?;
    }

    Ok(())
}
