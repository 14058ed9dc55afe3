//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::usage::UsageLimits;

/// Main configuration for sugeum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SugeumConfig {
    /// Extraction provider (chat-completion API) configuration.
    pub provider: ProviderConfig,

    /// Record store (Notion) configuration.
    pub store: StoreConfig,

    /// Daily usage limits.
    pub limits: UsageLimits,

    /// Extraction behaviour.
    pub extraction: ExtractionConfig,
}

/// Chat-completion provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Sampling temperature. Kept low to limit schema drift.
    pub temperature: f32,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Attempts per request, including the first one.
    pub max_attempts: u32,

    /// Base backoff delay between attempts, in milliseconds.
    pub retry_base_delay_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com/v1".to_string(),
            model: "deepseek-chat".to_string(),
            temperature: 0.1,
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            timeout_secs: 30,
            max_attempts: 3,
            retry_base_delay_ms: 500,
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Notion API base URL.
    pub base_url: String,

    /// Value of the `Notion-Version` header.
    pub notion_version: String,

    /// Environment variable holding the integration token.
    pub api_key_env: String,

    /// Environment variable holding the database id.
    pub database_id_env: String,

    /// Database id; overrides the environment variable when set.
    pub database_id: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.notion.com/v1".to_string(),
            notion_version: "2022-06-28".to_string(),
            api_key_env: "NOTION_API_KEY".to_string(),
            database_id_env: "NOTION_DB_ID".to_string(),
            database_id: None,
            timeout_secs: 30,
        }
    }
}

/// Extraction behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Skip the provider and use rules only.
    pub rules_only: bool,

    /// Maximum input length in characters; longer notes are truncated.
    pub max_input_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            rules_only: false,
            max_input_chars: 1000,
        }
    }
}

impl ProviderConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        read_env(&self.api_key_env)
    }
}

impl StoreConfig {
    /// Read the integration token from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        read_env(&self.api_key_env)
    }

    /// Database id from the config, else from the environment.
    pub fn database_id(&self) -> Option<String> {
        self.database_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .or_else(|| read_env(&self.database_id_env))
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl SugeumConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
