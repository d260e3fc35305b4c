//! Sampling and composition policies.

use serde::{Deserialize, Serialize};

/// How the sampler picks a fragment from a category's files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Try files in a uniformly shuffled order, and lines within each file
    /// in shuffled order, until one yields a non-empty payload.
    #[default]
    ShuffleFallback,
    /// Pick one file and one line uniformly; no retries.
    SinglePick,
}

/// What to return when there is no user text and no fragment at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPromptPolicy {
    /// Return an empty prompt.
    #[default]
    Permissive,
    /// Fail with [`Error::NothingGenerated`](crate::error::Error::NothingGenerated),
    /// carrying the sampling diagnostics.
    Strict,
}
