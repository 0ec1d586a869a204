use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use file_renamer::cli::{Args, Command, RuleArgs};
use file_renamer::config::resolve_journal_path;
use file_renamer::logging;
use file_renamer::output::{
    display_execution_result, display_history, display_plan, display_plan_json,
    display_undo_result,
};
use file_renamer::progress::should_use_colors;
use file_renamer::{
    collect_sources, AppError, Executor, Journal, JournalError, PlanBuilder, Progress, RenamePlan,
    UndoEngine,
};
use tracing::{debug, error, info};

fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(args.verbose);

    debug!("Environment loaded");

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("\nError: {}", e.detailed_message());
        std::process::exit(e.exit_code().into());
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut progress = Progress::new_with_ui(args.verbose > 0, should_use_colors());
    let journal = Journal::new(resolve_journal_path(args.journal.as_deref()));
    let mut stdout = std::io::stdout();

    debug!(path = ?journal.path(), "Using journal");

    match args.command {
        Command::Plan { rule, json, files } => {
            let plan = build_plan(&rule, &files)?;

            if json {
                display_plan_json(&plan, &mut stdout).map_err(display_error)?;
            } else {
                display_plan(&plan, &mut stdout).map_err(display_error)?;
            }

            let problems = plan
                .items
                .iter()
                .filter(|item| item.status.is_problem())
                .count();
            if problems > 0 {
                return Err(AppError::PlanConflicts { count: problems });
            }
        }

        Command::Run {
            rule,
            dry_run,
            files,
        } => {
            // Always plan immediately before executing
            let mut plan = build_plan(&rule, &files)?;
            let result = Executor::new(&journal).execute(&mut plan, dry_run, &mut progress)?;

            display_execution_result(&result, &mut stdout).map_err(display_error)?;

            if let Some(message) = &result.journal_error {
                return Err(AppError::JournalError {
                    path: Some(journal.path().to_path_buf()),
                    message: message.clone(),
                });
            }

            if result.failed > 0 {
                return Err(AppError::PartialFailure {
                    failed: result.failed,
                    total: result.renamed + result.dry_ok + result.failed,
                    errors: result.errors,
                });
            }

            // Same outcome as `plan` for items the rule could not name
            if result.rule_errors > 0 {
                return Err(AppError::PlanConflicts {
                    count: result.rule_errors,
                });
            }
        }

        Command::Undo { dry_run } => {
            let engine = UndoEngine::new(&journal);
            let result = if dry_run {
                engine.preview_last()?
            } else {
                engine.undo_last(&mut progress)?
            };

            display_undo_result(&result, &mut stdout).map_err(display_error)?;

            if result.failed > 0 {
                return Err(AppError::PartialFailure {
                    failed: result.failed,
                    total: result.outcomes.len(),
                    errors: result.errors,
                });
            }
        }

        Command::History => {
            let batches = journal
                .batches()
                .map_err(|e| journal_error(&journal, e))?;
            display_history(&batches, &mut stdout).map_err(display_error)?;
        }
    }

    stdout.flush().map_err(display_error)?;

    Ok(())
}

fn build_plan(rule: &RuleArgs, files: &[PathBuf]) -> Result<RenamePlan, AppError> {
    let config = rule.to_config();
    config.validate()?;

    let sources = collect_sources(files)?;
    info!("Collected {} source files", sources.len());

    Ok(PlanBuilder::new(&config).build(&sources))
}

fn journal_error(journal: &Journal, err: JournalError) -> AppError {
    AppError::JournalError {
        path: Some(journal.path().to_path_buf()),
        message: err.to_string(),
    }
}

fn display_error(err: std::io::Error) -> AppError {
    AppError::Other(format!("Failed to display output: {}", err))
}
