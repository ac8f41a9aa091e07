use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::ApiKeySource;
use crate::api::ENDPOINT;
use crate::chat::{ChatOptions, DEFAULT_CHAT_MODEL};
use crate::hover::HoverPolicy;
use crate::paths;
use crate::translation::{
    DEFAULT_MAX_TOKENS, DEFAULT_TARGET_LANGUAGE, DEFAULT_TIMEOUT, DEFAULT_TRANSLATION_MODEL,
    TranslationOptions,
};

/// Environment variable consulted for the API key unless overridden.
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Settings in the `[comment_translate]` section of config.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API key stored directly in config (not recommended).
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,
    /// Messages API endpoint URL.
    pub endpoint: String,
    /// Model used for hover translations.
    pub translation_model: String,
    /// Model used for the chat panel.
    pub chat_model: String,
    pub max_tokens: u32,
    /// Language name the hover text is translated into.
    pub target_language: String,
    /// Hover translation timeout in milliseconds.
    pub timeout_ms: u64,
    pub hover_policy: HoverPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: Some(DEFAULT_API_KEY_ENV.to_string()),
            endpoint: ENDPOINT.to_string(),
            translation_model: DEFAULT_TRANSLATION_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            hover_policy: HoverPolicy::default(),
        }
    }
}

impl Settings {
    /// Gets the API key, preferring the environment variable over the config file.
    ///
    /// Returns an empty string when neither is set.
    pub fn get_api_key(&self) -> String {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return key;
        }
        self.api_key.clone().unwrap_or_default()
    }

    pub fn translation_options(&self) -> TranslationOptions {
        TranslationOptions {
            model: self.translation_model.clone(),
            max_tokens: self.max_tokens,
            target_language: self.target_language.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            model: self.chat_model.clone(),
            max_tokens: self.max_tokens,
        }
    }
}

impl ApiKeySource for Settings {
    fn api_key(&self) -> String {
        self.get_api_key()
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/hover-translate/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub comment_translate: Settings,
}

/// Loads the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a config manager for the default location.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/hover-translate/config.toml`
    /// or `~/.config/hover-translate/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_file()?,
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Like [`load`](Self::load), but a missing file yields defaults.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        match fs::metadata(&self.config_path) {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
                Ok(ConfigFile::default())
            }
            _ => self.load(),
        }
    }
}
