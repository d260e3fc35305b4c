//! Configuration loading, validation, and management for PonyPrompt.
//!
//! Loads configuration from `~/.ponyprompt/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use ponyprompt_core::{Category, EmptyPromptPolicy, SelectionPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.ponyprompt/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the category files live
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// How fragments are picked
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// How fragments are merged with user text
    #[serde(default)]
    pub compose: ComposeConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Corpus root. A leading `~` is expanded to the home directory.
    #[serde(default = "default_corpus_root")]
    pub root: PathBuf,

    /// Required file extension for candidate files. Empty = any regular file.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Ordered categories; order decides fragment order in the prompt.
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
}

fn default_corpus_root() -> PathBuf {
    AppConfig::config_dir().join("corpus")
}
fn default_extension() -> String {
    "txt".into()
}
fn default_categories() -> Vec<Category> {
    vec![
        Category::new("faces", "01_faces"),
        Category::new("clothing", "02_clothing"),
        Category::new("posture", "03_posture"),
        Category::new("b", "04_b"),
        Category::new("p", "05_p"),
        Category::new("actions", "06_actions"),
    ]
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: default_corpus_root(),
            extension: default_extension(),
            categories: default_categories(),
        }
    }
}

impl CorpusConfig {
    /// The corpus root with `~` expanded.
    pub fn resolved_root(&self) -> PathBuf {
        expand_tilde(&self.root)
    }

    /// The extension filter, or `None` when every regular file is a candidate.
    pub fn extension_filter(&self) -> Option<&str> {
        let ext = self.extension.trim().trim_start_matches('.');
        if ext.is_empty() { None } else { Some(ext) }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default)]
    pub selection: SelectionPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Token placed before a non-empty prompt. Empty = no prefix.
    #[serde(default = "default_command_token")]
    pub command_token: String,

    /// Separator between fragments
    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default)]
    pub empty_prompt: EmptyPromptPolicy,
}

fn default_command_token() -> String {
    "/imagine".into()
}
fn default_separator() -> String {
    ", ".into()
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            command_token: default_command_token(),
            separator: default_separator(),
            empty_prompt: EmptyPromptPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub allow_public_bind: bool,
}

fn default_port() -> u16 {
    5150
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allow_public_bind: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.ponyprompt/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `PONYPROMPT_CORPUS_ROOT`
    /// - `PONYPROMPT_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("PONYPROMPT_CORPUS_ROOT").filter(|r| !r.trim().is_empty()) {
            self.corpus.root = PathBuf::from(root.trim());
        }

        if let Some(port) = lookup("PONYPROMPT_PORT") {
            self.gateway.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("PONYPROMPT_PORT is not a valid port: {port}"))
            })?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ponyprompt")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for category in &self.corpus.categories {
            if category.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "category names must not be empty".into(),
                ));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate category name '{}'",
                    category.name
                )));
            }
            validate_subdir(category)?;
        }

        if self.compose.separator.is_empty() {
            return Err(ConfigError::ValidationError(
                "compose.separator must not be empty".into(),
            ));
        }

        if self.gateway.host == "0.0.0.0" && !self.gateway.allow_public_bind {
            return Err(ConfigError::ValidationError(
                "gateway bound to 0.0.0.0 without allow_public_bind = true".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// A category subdirectory must stay inside the corpus root.
fn validate_subdir(category: &Category) -> Result<(), ConfigError> {
    let subdir = Path::new(&category.subdir);
    if category.subdir.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "category '{}' has an empty subdir",
            category.name
        )));
    }
    let escapes = subdir
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ConfigError::ValidationError(format!(
            "category '{}' subdir '{}' must be a relative path inside the corpus root",
            category.name, category.subdir
        )));
    }
    Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs_home().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
