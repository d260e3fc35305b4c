//! Prompt composition — merge user text with one fragment per category.
//!
//! Layout of a composed prompt:
//!
//! ```text
//! <command token> <user text> <fragment 1><sep><fragment 2><sep>...
//! ```
//!
//! The command token is only emitted when something follows it. Categories
//! that yield nothing are skipped without affecting the others.

use crate::sampler::CategorySampler;
use ponyprompt_config::AppConfig;
use ponyprompt_core::corpus::{Category, CorpusSource};
use ponyprompt_core::error::{Error, Result};
use ponyprompt_core::policy::{EmptyPromptPolicy, SelectionPolicy};
use ponyprompt_core::prompt::{CategoryStatus, PromptResult};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Settings for a [`PromptComposer`].
#[derive(Debug, Clone)]
pub struct ComposerSettings {
    pub root: PathBuf,
    pub categories: Vec<Category>,
    pub extension: Option<String>,
    pub selection: SelectionPolicy,
    pub command_token: String,
    pub separator: String,
    pub empty_prompt: EmptyPromptPolicy,
}

impl ComposerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            root: config.corpus.resolved_root(),
            categories: config.corpus.categories.clone(),
            extension: config.corpus.extension_filter().map(str::to_string),
            selection: config.sampling.selection,
            command_token: config.compose.command_token.trim().to_string(),
            separator: config.compose.separator.clone(),
            empty_prompt: config.compose.empty_prompt,
        }
    }
}

/// Builds prompts from user text and the configured categories.
///
/// Immutable after construction, so one instance can serve concurrent
/// requests behind an `Arc`.
pub struct PromptComposer {
    sampler: CategorySampler,
    categories: Vec<Category>,
    command_token: String,
    separator: String,
    empty_prompt: EmptyPromptPolicy,
}

impl PromptComposer {
    pub fn new(source: Arc<dyn CorpusSource>, settings: ComposerSettings) -> Self {
        Self {
            sampler: CategorySampler::new(
                source,
                settings.root,
                settings.extension,
                settings.selection,
            ),
            categories: settings.categories,
            command_token: settings.command_token,
            separator: settings.separator,
            empty_prompt: settings.empty_prompt,
        }
    }

    pub fn from_config(source: Arc<dyn CorpusSource>, config: &AppConfig) -> Self {
        Self::new(source, ComposerSettings::from_config(config))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn sampler(&self) -> &CategorySampler {
        &self.sampler
    }

    /// Compose a prompt from `user_text` and one fragment per category.
    ///
    /// Only fails under [`EmptyPromptPolicy::Strict`] when there is neither
    /// user text nor a single fragment.
    pub fn compose<R: Rng + ?Sized>(&self, user_text: &str, rng: &mut R) -> Result<PromptResult> {
        let mut result = PromptResult::default();

        for category in &self.categories {
            let outcome = self.sampler.sample(category, rng);
            result.diagnostics.extend(outcome.diagnostics);
            if let Some(fragment) = outcome.fragment {
                result.fragments.push(fragment);
            }
        }

        let texts: Vec<&str> = result.fragments.iter().map(|f| f.text.as_str()).collect();
        let user_text = user_text.trim();
        let body = self.join(user_text, &texts);

        debug!(
            user_text_len = user_text.len(),
            fragments = result.fragments.len(),
            categories = self.categories.len(),
            diagnostics = result.diagnostics.len(),
            "Prompt composed"
        );

        result.full_prompt = if body.is_empty() {
            match self.empty_prompt {
                EmptyPromptPolicy::Permissive => String::new(),
                EmptyPromptPolicy::Strict => {
                    return Err(Error::NothingGenerated {
                        diagnostics: result.diagnostics,
                    });
                }
            }
        } else if self.command_token.is_empty() {
            body
        } else {
            format!("{} {}", self.command_token, body)
        };

        Ok(result)
    }

    /// User text, a space, then the joined fragments; either part may be empty.
    fn join(&self, user_text: &str, fragments: &[&str]) -> String {
        let joined = fragments.join(&self.separator);
        match (user_text.is_empty(), joined.is_empty()) {
            (_, true) => user_text.to_string(),
            (true, false) => joined,
            (false, false) => format!("{user_text} {joined}"),
        }
    }

    /// Report the availability of every configured category.
    pub fn survey(&self) -> Vec<CategoryStatus> {
        self.categories
            .iter()
            .map(|category| {
                let path = category.dir(self.sampler.root()).display().to_string();
                let (available, files, error) = match self.sampler.candidates(category) {
                    Ok(files) => (true, files.len(), None),
                    Err(e) => (false, 0, Some(e.to_string())),
                };
                CategoryStatus {
                    name: category.name.clone(),
                    subdir: category.subdir.clone(),
                    path,
                    available,
                    files,
                    error,
                }
            })
            .collect()
    }
}
