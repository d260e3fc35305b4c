//! Filesystem corpus backend.
//!
//! Reads category directories straight from disk. Every call opens, reads,
//! and releases its handle before returning; nothing is cached, so edits to
//! the corpus are picked up on the next request.

use ponyprompt_core::corpus::CorpusSource;
use ponyprompt_core::error::CorpusError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// A corpus backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCorpus;

impl FsCorpus {
    pub fn new() -> Self {
        Self
    }
}

impl CorpusSource for FsCorpus {
    fn name(&self) -> &str {
        "fs"
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<String>, CorpusError> {
        let metadata = std::fs::metadata(dir).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CorpusError::DirectoryNotFound {
                path: dir.to_path_buf(),
            },
            _ => CorpusError::ListFailed {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        if !metadata.is_dir() {
            return Err(CorpusError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let entries = std::fs::read_dir(dir).map_err(|e| CorpusError::ListFailed {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            // Follows symlinks, so a link to a regular file counts as a file.
            let is_file = std::fs::metadata(entry.path())
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    debug!(dir = %dir.display(), name = ?raw, "Skipping non UTF-8 file name");
                }
            }
        }

        names.sort();
        Ok(names)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, CorpusError> {
        std::fs::read(path).map_err(|e| CorpusError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
