//! Diagnostics — non-fatal problems recorded while sampling.
//!
//! Sampling never fails because of a bad directory or file. Instead each
//! problem becomes a [`Diagnostic`] carried back to the caller, which
//! decides whether to log it.

use serde::{Deserialize, Serialize};

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The category directory is missing, not a directory, or unlistable
    CorpusUnavailable,
    /// A candidate file could not be read
    FileUnreadable,
    /// A file was not valid UTF-8 and was decoded as Latin-1 instead
    EncodingFallback,
    /// A category or file had nothing usable to contribute
    NoEligibleContent,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CorpusUnavailable => "corpus_unavailable",
            Self::FileUnreadable => "file_unreadable",
            Self::EncodingFallback => "encoding_fallback",
            Self::NoEligibleContent => "no_eligible_content",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Category being sampled
    pub category: String,

    /// File involved, if the problem is file-specific
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    pub kind: DiagnosticKind,

    /// Human-readable detail
    pub message: String,
}

impl Diagnostic {
    pub fn category(
        category: impl Into<String>,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            file: None,
            kind,
            message: message.into(),
        }
    }

    pub fn file(
        category: impl Into<String>,
        file: impl Into<String>,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            file: Some(file.into()),
            kind,
            message: message.into(),
        }
    }

    /// Log this diagnostic through `tracing`.
    ///
    /// Encoding fallbacks are routine for hand-authored corpora and go to
    /// `debug`; everything else is a warning.
    pub fn emit(&self) {
        let file = self.file.as_deref().unwrap_or("-");
        match self.kind {
            DiagnosticKind::EncodingFallback => tracing::debug!(
                category = %self.category,
                file = %file,
                kind = %self.kind,
                "{}",
                self.message
            ),
            _ => tracing::warn!(
                category = %self.category,
                file = %file,
                kind = %self.kind,
                "{}",
                self.message
            ),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(
                f,
                "[{}] {} ({}): {}",
                self.kind, self.category, file, self.message
            ),
            None => write!(f, "[{}] {}: {}", self.kind, self.category, self.message),
        }
    }
}
