use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::rule::NameRuleConfig;

#[derive(Parser, Debug)]
#[command(name = "file-renamer")]
#[command(author, version, long_about = None)]
#[command(about = "Batch rename files with sequential numbering and find/replace, with undo")]
pub struct Args {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Undo journal location (default: $FILE_RENAMER_JOURNAL or ~/file_renamer_undo.csv)
    #[arg(long, value_name = "PATH", global = true)]
    pub journal: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the rename plan without changing anything
    Plan {
        #[command(flatten)]
        rule: RuleArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,

        /// Files to rename, in numbering order
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,
    },

    /// Rename files and record the batch in the journal
    Run {
        #[command(flatten)]
        rule: RuleArgs,

        /// Check every rename without touching the filesystem or journal
        #[arg(short, long)]
        dry_run: bool,

        /// Files to rename, in numbering order
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,
    },

    /// Reverse the most recent batch
    Undo {
        /// Show what would be restored without changing anything
        #[arg(short, long)]
        dry_run: bool,
    },

    /// List journaled batches
    History,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RuleArgs {
    /// Base name for numbering: <BASE>_<NNN><ext>
    #[arg(short, long, value_name = "BASE", default_value = "")]
    pub base: String,

    /// First number
    #[arg(short, long, default_value = "1")]
    pub start: u32,

    /// Minimum digits of the number
    #[arg(short, long, default_value = "3", value_parser = clap::value_parser!(u16).range(1..))]
    pub width: u16,

    /// Text to find in file names
    #[arg(short, long, value_name = "TEXT", default_value = "")]
    pub find: String,

    /// Replacement text
    #[arg(short, long, value_name = "TEXT", default_value = "")]
    pub replace: String,

    /// Treat --find as a regular expression
    #[arg(short = 'x', long)]
    pub regex: bool,

    /// Let items whose replacement failed use up a number
    #[arg(long)]
    pub error_consumes_index: bool,
}

impl RuleArgs {
    pub fn to_config(&self) -> NameRuleConfig {
        NameRuleConfig {
            base_name: self.base.clone(),
            start_index: self.start,
            width: usize::from(self.width),
            find_text: self.find.clone(),
            replace_text: self.replace.clone(),
            use_regex: self.regex,
            error_consumes_index: self.error_consumes_index,
        }
    }
}
