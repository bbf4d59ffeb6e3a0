//! Attachment loading from the local file system.
//!
//! Each `--file` argument is read as UTF-8 text. A file that cannot be read
//! is reported and skipped; it never aborts the run.
//!
//! # Example
//!
//! ```ignore
//! use duet_infrastructure::AttachmentLoader;
//! use std::path::PathBuf;
//!
//! let report = AttachmentLoader::new().load_all(&[PathBuf::from("src/main.rs")]);
//! for failure in &report.failed {
//!     eprintln!("skipped {}: {}", failure.path.display(), failure.error);
//! }
//! let contents = report.contents();
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A successfully read attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAttachment {
    pub path: PathBuf,
    pub content: String,
}

impl LoadedAttachment {
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// An attachment that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of loading a batch of attachments, in argument order.
#[derive(Debug, Clone, Default)]
pub struct AttachmentReport {
    pub loaded: Vec<LoadedAttachment>,
    pub failed: Vec<AttachmentFailure>,
}

impl AttachmentReport {
    /// Contents of the loaded files, in the order given.
    pub fn contents(&self) -> Vec<String> {
        self.loaded.iter().map(|a| a.content.clone()).collect()
    }

    pub fn into_contents(self) -> Vec<String> {
        self.loaded.into_iter().map(|a| a.content).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AttachmentLoader;

impl AttachmentLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, path: &Path) -> Result<LoadedAttachment, AttachmentFailure> {
        if path.is_dir() {
            return Err(AttachmentFailure {
                path: path.to_path_buf(),
                error: "is a directory".to_string(),
            });
        }
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), chars = content.len(), "Loaded attachment");
                Ok(LoadedAttachment {
                    path: path.to_path_buf(),
                    content,
                })
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load attachment");
                Err(AttachmentFailure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                })
            }
        }
    }

    pub fn load_all(&self, paths: &[PathBuf]) -> AttachmentReport {
        let mut report = AttachmentReport::default();
        for path in paths {
            match self.load(path) {
                Ok(loaded) => report.loaded.push(loaded),
                Err(failure) => report.failed.push(failure),
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_in_order_and_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "alpha").unwrap();
        fs::write(&b, "beta").unwrap();
        let missing = dir.path().join("missing.txt");

        let report = AttachmentLoader::new().load_all(&[b.clone(), missing.clone(), a.clone()]);

        assert_eq!(report.contents(), vec!["beta", "alpha"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, missing);
        assert_eq!(report.loaded[0].char_count(), 4);
    }

    #[test]
    fn test_directory_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = AttachmentLoader::new().load(dir.path()).unwrap_err();
        assert_eq!(err.error, "is a directory");
    }

    #[test]
    fn test_non_utf8_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(AttachmentLoader::new().load(&path).is_err());
    }

    #[test]
    fn test_empty_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();
        let report = AttachmentLoader::new().load_all(&[path]);
        assert_eq!(report.into_contents(), vec![String::new()]);
    }
}
