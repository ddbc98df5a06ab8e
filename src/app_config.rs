use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::language_utils::{DEFAULT_SOURCE_LANGUAGE, base_language, validate_language_code};
use crate::providers::openai::DEFAULT_ENDPOINT;
use crate::session::TranslationSettings;
use crate::storage::Preferences;

/// Contents of `conf.json`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language catalogs are expected to be written in; a mismatch is reported before translating
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Languages to translate into when none are given on the command line
    #[serde(default)]
    pub target_languages: Vec<String>,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Model provider settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Model identifier; stored preferences are used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API key; the `OPENAI_API_KEY` variable and stored preferences are used when empty
    #[serde(default)]
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Free-text description of the app passed to every request; stored preferences are used when empty
    #[serde(default)]
    pub app_context: String,
}

impl TranslationConfig {
    /// Session settings from these values, falling back to stored preferences
    ///
    /// Command-line overrides are expected to be applied to the config first.
    pub fn to_settings(&self, preferences: &Preferences) -> TranslationSettings {
        let stored = preferences.to_settings();
        let non_empty = |text: &str| Some(text.trim().to_string()).filter(|t| !t.is_empty());

        TranslationSettings {
            api_key: non_empty(&self.api_key).unwrap_or(stored.api_key),
            save_api_key: stored.save_api_key,
            model: self.model.as_deref().and_then(non_empty).unwrap_or(stored.model),
            app_context: non_empty(&self.app_context).unwrap_or(stored.app_context),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: None,
            api_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            app_context: String::new(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    DEFAULT_SOURCE_LANGUAGE.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_languages: Vec::new(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        validate_language_code(&self.source_language)
            .context("Invalid source language")?;

        for code in &self.target_languages {
            if code.trim().is_empty() {
                return Err(anyhow!("Target language codes cannot be empty"));
            }
            validate_language_code(code)?;
        }

        if self.translation.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(anyhow!("Model name cannot be empty"));
        }

        let url = Url::parse(&self.translation.endpoint)
            .with_context(|| format!("Invalid endpoint URL: {}", self.translation.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("Endpoint must use http or https: {}", self.translation.endpoint));
        }

        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("Timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Whether a catalog whose source is `catalog_source` matches `source_language`
    ///
    /// Only the base language is compared, so `en` matches `en-GB`.
    pub fn expects_source_language(&self, catalog_source: &str) -> bool {
        base_language(self.source_language.trim()).eq_ignore_ascii_case(base_language(catalog_source.trim()))
    }

    /// Read a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Read `path`, or create it with defaults when it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }
}
