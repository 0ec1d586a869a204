//! Progress output for user-facing status updates.
//!
//! In verbose mode output is suppressed since tracing handles everything.
//! In normal mode each rename or reversal gets one line on stderr.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Progress reporter for user-facing output
pub struct Progress {
    writer: Box<dyn Write>,
    /// When true, all output is suppressed (verbose mode uses tracing instead)
    silent: bool,
    /// When true, output is colorized
    colors_enabled: bool,
}

/// Check if we should use colors in output
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    io::stderr().is_terminal()
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Create a new progress reporter writing to stderr
    pub fn new() -> Self {
        Self {
            writer: Box::new(io::stderr()),
            silent: false,
            colors_enabled: should_use_colors(),
        }
    }

    /// Create a progress reporter that respects UI mode
    /// When verbose=true, output is suppressed (tracing handles it)
    pub fn new_with_ui(verbose: bool, colors_enabled: bool) -> Self {
        Self {
            writer: Box::new(io::stderr()),
            silent: verbose,
            colors_enabled,
        }
    }

    /// Create a progress reporter with a custom writer
    pub fn with_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            silent: false,
            colors_enabled: false,
        }
    }

    /// Create a silent progress reporter (library callers, tests)
    pub fn silent() -> Self {
        Self {
            writer: Box::new(io::sink()),
            silent: true,
            colors_enabled: false,
        }
    }

    fn emit(&mut self, styled: impl std::fmt::Display, plain: &str) {
        if self.silent {
            return;
        }
        let _ = if self.colors_enabled {
            writeln!(self.writer, "{}", styled)
        } else {
            writeln!(self.writer, "{}", plain)
        };
    }

    fn heading(&mut self, message: String) {
        self.emit(message.bold(), &message);
    }

    fn arrow_line(&mut self, current: usize, total: usize, from: &str, to: &str) {
        let counter = format!("[{}/{}]", current, total);
        let styled = format!("{} {} {} {}", counter.cyan(), from.dimmed(), "→".cyan(), to);
        self.emit(styled, &format!("{} {} -> {}", counter, from, to));
    }

    /// Announce a batch of renames
    pub fn rename_start(&mut self, total: usize, dry_run: bool) {
        let label = if dry_run { "Checking" } else { "Renaming" };
        self.heading(format!("{} {} files", label, total));
    }

    /// Report progress on a single rename
    pub fn rename_progress(&mut self, current: usize, total: usize, from: &str, to: &str) {
        self.arrow_line(current, total, from, to);
    }

    /// Report a non-fatal problem
    pub fn warn(&mut self, message: &str) {
        let styled = format!("{} {}", "!".yellow().bold(), message.yellow());
        self.emit(styled, &format!("Warning: {}", message));
    }

    pub fn journal_written(&mut self, path: &Path, count: usize) {
        let message = format!("Journal updated ({} entries): {}", count, path.display());
        self.emit(message.dimmed(), &message);
    }

    pub fn undo_start(&mut self, total: usize, timestamp: &str) {
        self.heading(format!("Undoing {} renames from batch {}", total, timestamp));
    }

    /// Report progress on a single reversal
    pub fn undo_progress(&mut self, current: usize, total: usize, from: &str, to: &str) {
        self.arrow_line(current, total, from, to);
    }
}
