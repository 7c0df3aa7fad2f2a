//! Configuration loading, validation, and management for Cloakroom.
//!
//! Loads configuration from `~/.cloakroom/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use cloakroom_core::detect::DetectionRule;
use cloakroom_core::kind::PiiKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.cloakroom/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Masking engine settings
    #[serde(default)]
    pub masking: MaskingConfig,

    /// Detector settings
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Lemmatizer settings
    #[serde(default)]
    pub lemmatizer: LemmatizerConfig,

    /// LLM provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Settings for the masking engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Detection language passed to the detector
    #[serde(default = "default_language")]
    pub language: String,

    /// Which kinds to request from detection
    #[serde(default = "default_kinds")]
    pub kinds: Vec<PiiKind>,
}

fn default_language() -> String {
    "ru".into()
}
fn default_kinds() -> Vec<PiiKind> {
    PiiKind::DETECTABLE.to_vec()
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            kinds: default_kinds(),
        }
    }
}

/// Settings for the detection capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Which backend to use ("regex" is the only built-in)
    #[serde(default = "default_detector_backend")]
    pub backend: String,

    /// Detection rules. Empty means the backend's built-in rule set.
    #[serde(default)]
    pub rules: Vec<DetectionRule>,
}

fn default_detector_backend() -> String {
    "regex".into()
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            backend: default_detector_backend(),
            rules: vec![],
        }
    }
}

/// Settings for the lemmatization capability.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LemmatizerConfig {
    /// Extra dictionary overrides: inflected form → lemma
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

/// Settings for the LLM provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for a real backend (unused by the scripted provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "scripted".into()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}

/// Settings for the agent loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum tool call iterations per turn
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Override the system prompt entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}

fn default_max_iterations() -> u32 {
    8
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            system_prompt_override: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.cloakroom/config.toml).
    ///
    /// Environment variable overrides (highest priority):
    /// - `CLOAKROOM_API_KEY` — provider API key
    /// - `CLOAKROOM_MODEL` — model identifier
    /// - `CLOAKROOM_LANGUAGE` — detection language
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.provider.api_key.is_none() {
            config.provider.api_key = std::env::var("CLOAKROOM_API_KEY").ok();
        }
        if let Ok(model) = std::env::var("CLOAKROOM_MODEL") {
            config.provider.model = model;
        }
        if let Ok(language) = std::env::var("CLOAKROOM_LANGUAGE") {
            config.masking.language = language;
        }

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

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".cloakroom")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.masking.language.is_empty() {
            return Err(ConfigError::ValidationError(
                "masking.language must not be empty".into(),
            ));
        }
        if self.masking.kinds.is_empty() {
            return Err(ConfigError::ValidationError(
                "masking.kinds must name at least one kind".into(),
            ));
        }
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_iterations must be at least 1".into(),
            ));
        }
        for rule in &self.detector.rules {
            if rule.name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "detector rule with empty name".into(),
                ));
            }
            if rule.pattern.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "detector rule '{}' has an empty pattern",
                    rule.name
                )));
            }
        }
        Ok(())
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
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
