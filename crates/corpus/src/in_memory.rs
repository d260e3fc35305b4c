//! In-memory corpus — useful for testing and embedded fixtures.

use ponyprompt_core::corpus::CorpusSource;
use ponyprompt_core::error::CorpusError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum Entry {
    File(Vec<u8>),
    /// A file that exists but fails every read
    Unreadable(String),
}

/// A corpus held entirely in memory.
///
/// Directories are implied by the files placed in them; empty directories
/// can be added with [`InMemoryCorpus::with_dir`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    files: BTreeMap<PathBuf, Entry>,
    dirs: BTreeSet<PathBuf>,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given contents.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl AsRef<[u8]>) -> Self {
        let path = path.into();
        self.add_ancestors(&path);
        self.files
            .insert(path, Entry::File(contents.as_ref().to_vec()));
        self
    }

    /// Add a file that is listed but cannot be read.
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        let path = path.into();
        self.add_ancestors(&path);
        self.files.insert(path, Entry::Unreadable(reason.into()));
        self
    }

    /// Add an empty directory.
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.add_ancestors(&path);
        self.dirs.insert(path);
        self
    }

    fn add_ancestors(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl CorpusSource for InMemoryCorpus {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<String>, CorpusError> {
        if self.files.contains_key(dir) {
            return Err(CorpusError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        if !self.dirs.contains(dir) {
            return Err(CorpusError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        // BTreeMap iteration keeps the names sorted.
        Ok(self
            .files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect())
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, CorpusError> {
        match self.files.get(path) {
            Some(Entry::File(bytes)) => Ok(bytes.clone()),
            Some(Entry::Unreadable(reason)) => Err(CorpusError::ReadFailed {
                path: path.to_path_buf(),
                reason: reason.clone(),
            }),
            None => Err(CorpusError::ReadFailed {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            }),
        }
    }
}
