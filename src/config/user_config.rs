//! User-level configuration for critiq
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/critiq/config.toml
//!
//! Everything is read once at startup; components receive plain values,
//! never this struct.

use crate::ai::{RemoteConfig, RemoteScorer};
use crate::feedback;
use crate::parsers;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
    /// Feedback persona: savage, professional, gentle
    pub persona: Option<String>,

    /// Debounce interval for repeated saves of the same file, milliseconds
    pub debounce_ms: Option<u64>,

    /// File extensions to watch (without dots)
    pub extensions: Option<Vec<String>>,

    #[serde(default)]
    pub ai: AiSettings,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AiSettings {
    /// API key for the remote scorer (BYOK)
    pub api_key: Option<String>,

    /// OpenAI-compatible chat-completions endpoint override
    pub api_url: Option<String>,

    /// Model to use
    pub model: Option<String>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/critiq/config.toml)
    pub fn load() -> Self {
        let mut config = UserConfig::default();

        if let Some(user_config) = Self::user_config_path()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|content| toml::from_str::<UserConfig>(&content).ok())
        {
            config.merge(user_config);
        }

        // Environment variables override everything
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.ai.api_key = Some(key);
        }
        if let Ok(persona) = std::env::var("CRITIQ_PERSONA") {
            config.persona = Some(persona);
        }
        if let Ok(url) = std::env::var("CRITIQ_API_URL") {
            config.ai.api_url = Some(url);
        }

        config
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("critiq").join("config.toml"))
    }

    /// Where the history database lives.
    ///
    /// `CRITIQ_DATA_DIR` relocates the store, which scripts and tests use
    /// to keep runs isolated.
    pub fn history_db_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("CRITIQ_DATA_DIR") {
            return Some(PathBuf::from(dir).join("history.db"));
        }
        dirs::data_dir().map(|p| p.join("critiq").join("history.db"))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        if other.persona.is_some() {
            self.persona = other.persona;
        }
        if other.debounce_ms.is_some() {
            self.debounce_ms = other.debounce_ms;
        }
        if other.extensions.is_some() {
            self.extensions = other.extensions;
        }
        if other.ai.api_key.is_some() {
            self.ai.api_key = other.ai.api_key;
        }
        if other.ai.api_url.is_some() {
            self.ai.api_url = other.ai.api_url;
        }
        if other.ai.model.is_some() {
            self.ai.model = other.ai.model;
        }
    }

    pub fn persona(&self) -> &str {
        self.persona.as_deref().unwrap_or(feedback::DEFAULT_PERSONA)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    /// Extension allow-list, defaulting to every registered grammar
    pub fn extensions(&self) -> Vec<String> {
        match &self.extensions {
            Some(exts) => exts.iter().map(|e| e.trim_start_matches('.').to_string()).collect(),
            None => parsers::supported_extensions()
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    /// Check if the remote scoring path is available
    pub fn has_remote_key(&self) -> bool {
        self.ai.api_key.is_some()
    }

    /// Build the remote scorer when a credential is configured
    pub fn remote_scorer(&self) -> Option<RemoteScorer> {
        let api_key = self.ai.api_key.as_deref()?;
        let mut remote = RemoteConfig::default();
        if let Some(url) = &self.ai.api_url {
            remote.api_url = url.clone();
        }
        if let Some(model) = &self.ai.model {
            remote.model = model.clone();
        }
        Some(RemoteScorer::new(remote, api_key))
    }

    /// Initialize user config directory and create example config
    pub fn init_user_config() -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !config_path.exists() {
            let example = r#"# critiq User Configuration

# Feedback persona: "savage", "professional" (default), or "gentle"
# persona = "professional"

# Ignore repeated saves of the same file within this window
# debounce_ms = 1000

# Extensions to watch (defaults to every supported language)
# extensions = ["py", "rs", "ts", "js", "go", "java"]

[ai]
# Optional remote scorer (BYOK). Any failure falls back to local scoring.
# api_key = "sk-..."
# model = "gpt-4o"
# api_url = "https://api.openai.com/v1/chat/completions"
"#;
            std::fs::write(&config_path, example)?;
        }

        Ok(config_path)
    }
}
