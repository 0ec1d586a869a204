use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a file: {0}")]
    NotAFile(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    #[error("Failed to inspect path: {0}")]
    IoError(#[from] std::io::Error),
}

/// A file selected for renaming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path
    pub path: PathBuf,
    /// File name including extension
    pub name: String,
    /// File name without extension
    pub base_name: String,
    /// Extension with leading dot, or empty
    pub extension: String,
}

impl SourceFile {
    /// Derive name parts from an absolute path. No filesystem access.
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let base_name = path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Self {
            path,
            name,
            base_name,
            extension,
        }
    }
}

/// Resolve caller-supplied paths into source files, preserving input order.
///
/// Relative paths are anchored at the current directory. Directories are
/// rejected, never walked.
pub fn collect_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SourceFile>, ScannerError> {
    let cwd = env::current_dir()?;
    let mut sources = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };

        trace!(path = ?absolute, "Examining source");

        // Names are computed and journaled as text; a lossy name would not round-trip
        if absolute.to_str().is_none() {
            return Err(ScannerError::NonUtf8Path(absolute));
        }

        let metadata = fs::metadata(&absolute).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ScannerError::PathNotFound(absolute.clone()),
            std::io::ErrorKind::PermissionDenied => {
                ScannerError::PermissionDenied(absolute.clone())
            }
            _ => ScannerError::IoError(e),
        })?;

        if !metadata.is_file() {
            return Err(ScannerError::NotAFile(absolute));
        }

        debug!(path = ?absolute, "Found source file");
        sources.push(SourceFile::from_path(absolute));
    }

    debug!(count = sources.len(), "Collected sources");

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_from_path_splits_extension() {
        let source = SourceFile::from_path(PathBuf::from("/photos/holiday.jpeg"));

        assert_eq!(source.name, "holiday.jpeg");
        assert_eq!(source.base_name, "holiday");
        assert_eq!(source.extension, ".jpeg");
    }

    #[test]
    fn test_from_path_last_extension_only() {
        let source = SourceFile::from_path(PathBuf::from("/data/archive.tar.gz"));

        assert_eq!(source.base_name, "archive.tar");
        assert_eq!(source.extension, ".gz");
    }

    #[test]
    fn test_from_path_dotfile_has_no_extension() {
        let source = SourceFile::from_path(PathBuf::from("/home/u/.bashrc"));

        assert_eq!(source.name, ".bashrc");
        assert_eq!(source.extension, "");
    }

    #[test]
    fn test_collect_preserves_order() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.txt");
        let a = dir.path().join("a.txt");
        fs::write(&b, "b").unwrap();
        fs::write(&a, "a").unwrap();

        let sources = collect_sources(&[&b, &a]).unwrap();

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "b.txt");
        assert_eq!(sources[1].name, "a.txt");
        assert!(sources[0].path.is_absolute());
    }

    #[test]
    fn test_collect_missing_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let result = collect_sources(&[missing]);
        assert!(matches!(result, Err(ScannerError::PathNotFound(_))));
    }

    #[test]
    fn test_collect_rejects_directory() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        let result = collect_sources(&[sub]);
        assert!(matches!(result, Err(ScannerError::NotAFile(_))));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_collect_rejects_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"caf\xe9.txt"));
        fs::write(&path, "x").unwrap();

        let result = collect_sources(&[&path]);

        assert!(matches!(result, Err(ScannerError::NonUtf8Path(p)) if p == path));
        assert!(path.exists());
    }

    #[test]
    fn test_collect_empty_input() {
        let paths: Vec<PathBuf> = Vec::new();
        assert!(collect_sources(&paths).unwrap().is_empty());
    }
}
