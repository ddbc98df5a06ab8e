/*!
 * Persisted user preferences.
 *
 * Preferences live in one JSON file under the platform configuration
 * directory. The API key is stored base64-encoded. This is obfuscation only:
 * anyone who can read the file can recover the key.
 */

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::session::{DEFAULT_MODEL, TranslationSettings};

/// Directory name under the platform config directory
const PREFERENCES_DIRNAME: &str = "xcstrings-translator";

/// File name of the preferences file
const PREFERENCES_FILENAME: &str = "preferences.json";

/// Encode text for storage; reversible by anyone
pub fn obfuscate(text: &str) -> String {
    Base64.encode(text.as_bytes())
}

/// Decode text written by `obfuscate`; corrupt input yields an empty string
pub fn deobfuscate(text: &str) -> String {
    Base64
        .decode(text.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default()
}

/// Stored preferences; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Obfuscated API key
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub save_api_key: bool,
    #[serde(default)]
    pub app_context: String,
}

impl Preferences {
    /// Plain-text API key
    pub fn api_key(&self) -> String {
        deobfuscate(&self.api_key)
    }

    /// Settings seeded from these preferences
    pub fn to_settings(&self) -> TranslationSettings {
        TranslationSettings {
            api_key: self.api_key(),
            save_api_key: self.save_api_key,
            model: if self.model.is_empty() {
                DEFAULT_MODEL.to_string()
            } else {
                self.model.clone()
            },
            app_context: self.app_context.clone(),
        }
    }
}

/// JSON-file preference store
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Store backed by an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    /// `<config dir>/xcstrings-translator/preferences.json`
    pub fn default_path() -> Result<PathBuf> {
        let base_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(base_dir.join(PREFERENCES_DIRNAME).join(PREFERENCES_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read preferences; missing or unreadable files yield defaults
    pub fn load(&self) -> Preferences {
        if !self.path.exists() {
            return Preferences::default();
        }

        let result = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))
            .and_then(|text| serde_json::from_str(&text).context("Failed to parse preferences"));

        match result {
            Ok(preferences) => preferences,
            Err(e) => {
                warn!("{:#}", e);
                Preferences::default()
            }
        }
    }

    fn write(&self, preferences: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(preferences).context("Failed to serialize preferences")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))?;
        debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut Preferences)) -> Result<()> {
        let mut preferences = self.load();
        change(&mut preferences);
        self.write(&preferences)
    }

    pub fn save_api_key(&self, api_key: &str) -> Result<()> {
        self.update(|p| p.api_key = obfuscate(api_key))
    }

    pub fn remove_api_key(&self) -> Result<()> {
        self.update(|p| p.api_key.clear())
    }

    pub fn save_model(&self, model: &str) -> Result<()> {
        self.update(|p| p.model = model.to_string())
    }

    pub fn save_app_context(&self, app_context: &str) -> Result<()> {
        self.update(|p| p.app_context = app_context.to_string())
    }

    /// Record the save-key preference; turning it off forgets the stored key
    pub fn set_save_api_key(&self, save: bool, api_key: &str) -> Result<()> {
        self.update(|p| {
            p.save_api_key = save;
            if !save {
                p.api_key.clear();
            } else if !api_key.is_empty() {
                p.api_key = obfuscate(api_key);
            }
        })
    }

    /// Persist session settings, keeping the key only when allowed
    pub fn save_settings(&self, settings: &TranslationSettings) -> Result<()> {
        self.update(|p| {
            p.model = settings.model.clone();
            p.app_context = settings.app_context.clone();
            p.save_api_key = settings.save_api_key;
            p.api_key = if settings.save_api_key && !settings.api_key.is_empty() {
                obfuscate(&settings.api_key)
            } else {
                String::new()
            };
        })
    }
}
