use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment variable overriding the journal location
pub const ENV_JOURNAL_PATH: &str = "FILE_RENAMER_JOURNAL";

/// Journal file name under the home directory
pub const HOME_JOURNAL_NAME: &str = "file_renamer_undo.csv";

/// Journal file name used when no home directory is known
pub const FALLBACK_JOURNAL_NAME: &str = "rename_undo_log.csv";

/// Resolve the journal location.
///
/// Precedence: explicit path > `FILE_RENAMER_JOURNAL` (also read from a
/// `.env` file in the working directory) > `~/file_renamer_undo.csv` >
/// `./rename_undo_log.csv`.
pub fn resolve_journal_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        debug!(path = ?path, "Journal path from command line");
        return path.to_path_buf();
    }

    if let Some(path) = env::var_os(ENV_JOURNAL_PATH).filter(|v| !v.is_empty()) {
        debug!(path = ?path, "Journal path from environment");
        return PathBuf::from(path);
    }

    default_journal_path(dirs::home_dir().as_deref())
}

fn default_journal_path(home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) => home.join(HOME_JOURNAL_NAME),
        None => PathBuf::from(FALLBACK_JOURNAL_NAME),
    }
}
