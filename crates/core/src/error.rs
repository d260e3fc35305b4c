//! Error types for the PonyPrompt domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Corpus-level failures
//! are absorbed by the sampler and turned into diagnostics; only [`Error`]
//! crosses the composer boundary.

use crate::diagnostic::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all PonyPrompt operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Composition ---
    /// `diagnostics` holds everything recorded while sampling.
    #[error("Nothing to generate: no user text was given and no category produced a fragment")]
    NothingGenerated { diagnostics: Vec<Diagnostic> },
}

impl Error {
    /// Diagnostics attached to this error, if any.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::NothingGenerated { diagnostics } => diagnostics,
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures reported by a [`CorpusSource`](crate::corpus::CorpusSource).
#[derive(Debug, Clone, Error)]
pub enum CorpusError {
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to list {}: {reason}", path.display())]
    ListFailed { path: PathBuf, reason: String },

    #[error("Failed to read {}: {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },
}
