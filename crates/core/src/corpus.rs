//! Corpus trait — the abstraction over where category files live.
//!
//! The sampling engine never touches the filesystem directly. It lists and
//! reads files through a [`CorpusSource`], so the same algorithm runs
//! against a real directory tree or an in-memory fixture.

use crate::error::CorpusError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A named bucket of candidate files under the corpus root.
///
/// The configured order of categories is the order of fragments in the
/// composed prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identifier used in logs, diagnostics, and fragment reports
    pub name: String,

    /// Subdirectory of the corpus root holding this category's files
    pub subdir: String,
}

impl Category {
    pub fn new(name: impl Into<String>, subdir: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subdir: subdir.into(),
        }
    }

    /// Resolve this category's directory under `root`.
    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(&self.subdir)
    }
}

/// Read-only access to a corpus of category files.
///
/// Implementations must be safe to share across concurrent requests; the
/// corpus is treated as static for the life of the process.
pub trait CorpusSource: Send + Sync {
    /// Backend name for logs (e.g., "fs", "in_memory").
    fn name(&self) -> &str;

    /// List the names of the regular files directly inside `dir`, sorted.
    ///
    /// Subdirectories and other non-file entries are omitted.
    fn list_files(&self, dir: &Path) -> Result<Vec<String>, CorpusError>;

    /// Read the full contents of the file at `path`.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>, CorpusError>;
}
