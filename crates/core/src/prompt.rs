//! Prompt results and corpus survey types.

use crate::diagnostic::Diagnostic;
use serde::{Deserialize, Serialize};

/// One sampled payload and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub category: String,
    pub file: String,
    pub text: String,
}

/// The outcome of composing a prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptResult {
    /// The composed prompt, ready for the image pipeline
    pub full_prompt: String,

    /// Fragments in category order
    #[serde(default)]
    pub fragments: Vec<Fragment>,

    /// Non-fatal problems met while sampling
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl PromptResult {
    pub fn is_empty(&self) -> bool {
        self.full_prompt.is_empty()
    }

    /// Log every diagnostic through `tracing`.
    pub fn emit_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            diagnostic.emit();
        }
    }
}

/// Availability of one configured category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStatus {
    pub name: String,
    pub subdir: String,
    pub path: String,
    pub available: bool,
    /// Number of candidate files (after the extension filter)
    pub files: usize,
    /// Why the category is unavailable, when it is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
