//! Configuration file management
//!
//! Values are read from `~/.panda/config.toml` (or the path in `PANDA_CONFIG`)
//! and can be overridden by environment variables. Missing credentials are not
//! an error: each layer falls back to its degraded strategy.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::env::{apis as env_apis, pipeline as env_pipeline};

pub const DEFAULT_INDEX_NAME: &str = "panda-transcripts";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_OPENAI_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

/// Configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinecone_api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackendKind {
    #[default]
    Pinecone,
    Memory,
    Disabled,
}

impl std::str::FromStr for IndexBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pinecone" => Ok(Self::Pinecone),
            "memory" | "in-memory" | "local" => Ok(Self::Memory),
            "disabled" | "none" | "off" => Ok(Self::Disabled),
            _ => Err(format!(
                "Unknown index backend: '{s}'. Valid options: pinecone, memory, disabled"
            )),
        }
    }
}

impl std::fmt::Display for IndexBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pinecone => write!(f, "pinecone"),
            Self::Memory => write!(f, "memory"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexConfig {
    #[serde(default)]
    pub backend: IndexBackendKind,
    #[serde(default = "default_index_name")]
    pub name: String,
    #[serde(default = "default_cloud")]
    pub cloud: String,
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: IndexBackendKind::default(),
            name: default_index_name(),
            cloud: default_cloud(),
            region: default_region(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    #[default]
    OpenAi,
    Local,
}

impl std::str::FromStr for EmbeddingProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "open-ai" => Ok(Self::OpenAi),
            "local" | "hash" => Ok(Self::Local),
            _ => Err(format!(
                "Unknown embedding provider: '{s}'. Valid options: openai, local"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProviderKind,
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            model: default_embedding_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    /// Preferred provider ("openai" or "google-ai"); auto-selected when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: None,
            openai_model: default_openai_model(),
            gemini_model: default_gemini_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            score_threshold: default_score_threshold(),
        }
    }
}

fn default_index_name() -> String {
    DEFAULT_INDEX_NAME.to_string()
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_openai_model() -> String {
    DEFAULT_OPENAI_CHAT_MODEL.to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_top_k() -> usize {
    5
}

fn default_score_threshold() -> f32 {
    0.7
}

impl Config {
    /// Get the config file path (`PANDA_CONFIG` or ~/.panda/config.toml)
    pub fn get_config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(env_pipeline::CONFIG_PATH) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let home_dir = dirs::home_dir().context("Could not find home directory")?;
        Ok(home_dir.join(".panda").join("config.toml"))
    }

    /// Load configuration from the default location.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    /// Load the file and apply environment overrides on top.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        // API keys live in this file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(config_path, permissions).with_context(|| {
                format!(
                    "Failed to set permissions on config file: {}",
                    config_path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Environment variables take priority over the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Some(key) = non_empty_env(env_apis::OPENAI_API_KEY) {
            self.api.openai_api_key = Some(key);
        }
        if let Some(key) = non_empty_env(env_apis::GEMINI_API_KEY) {
            self.api.gemini_api_key = Some(key);
        }
        if let Some(key) = non_empty_env(env_apis::PINECONE_API_KEY) {
            self.api.pinecone_api_key = Some(key);
        }
        if let Some(region) = non_empty_env(env_apis::PINECONE_ENVIRONMENT) {
            self.index.region = region;
        }

        if let Some(value) = non_empty_env(env_pipeline::INDEX_BACKEND) {
            match value.parse() {
                Ok(kind) => self.index.backend = kind,
                Err(e) => tracing::warn!(error = %e, "Ignoring invalid index backend override"),
            }
        }
        if let Some(value) = non_empty_env(env_pipeline::EMBEDDING_PROVIDER) {
            match value.parse() {
                Ok(kind) => self.embedding.provider = kind,
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring invalid embedding provider override")
                }
            }
        }
        if let Some(value) = non_empty_env(env_pipeline::LLM_PROVIDER) {
            self.generation.provider = Some(value);
        }
    }

    /// Get a config value by key
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key).as_str() {
            "openai-api-key" => self.api.openai_api_key.clone(),
            "gemini-api-key" => self.api.gemini_api_key.clone(),
            "pinecone-api-key" => self.api.pinecone_api_key.clone(),
            "index-backend" => Some(self.index.backend.to_string()),
            "index-name" => Some(self.index.name.clone()),
            "index-region" => Some(self.index.region.clone()),
            "llm-provider" => self.generation.provider.clone(),
            "top-k" => Some(self.retrieval.top_k.to_string()),
            _ => None,
        }
    }

    /// Set a config value by key
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match normalize_key(key).as_str() {
            "openai-api-key" => self.api.openai_api_key = Some(value),
            "gemini-api-key" => self.api.gemini_api_key = Some(value),
            "pinecone-api-key" => self.api.pinecone_api_key = Some(value),
            "index-backend" => {
                self.index.backend = value.parse().map_err(anyhow::Error::msg)?;
            }
            "index-name" => self.index.name = value,
            "index-region" => self.index.region = value,
            "llm-provider" => self.generation.provider = Some(value),
            "top-k" => {
                self.retrieval.top_k = value
                    .parse()
                    .with_context(|| format!("top-k must be a positive integer, got '{value}'"))?;
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Unset (remove) a config value by key
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match normalize_key(key).as_str() {
            "openai-api-key" => self.api.openai_api_key = None,
            "gemini-api-key" => self.api.gemini_api_key = None,
            "pinecone-api-key" => self.api.pinecone_api_key = None,
            "llm-provider" => self.generation.provider = None,
            _ => anyhow::bail!("Unknown or non-removable config key: {}", key),
        }
        Ok(())
    }

    /// Get all config values as key-value pairs, with API keys masked
    pub fn list(&self) -> Vec<(String, String)> {
        let mut items = Vec::new();

        let keys = [
            ("openai-api-key", &self.api.openai_api_key),
            ("gemini-api-key", &self.api.gemini_api_key),
            ("pinecone-api-key", &self.api.pinecone_api_key),
        ];
        for (name, value) in keys {
            if let Some(ref key) = value {
                items.push((name.to_string(), mask_api_key(key)));
            }
        }

        items.push(("index-backend".to_string(), self.index.backend.to_string()));
        items.push(("index-name".to_string(), self.index.name.clone()));
        items.push(("index-region".to_string(), self.index.region.clone()));
        if let Some(ref provider) = self.generation.provider {
            items.push(("llm-provider".to_string(), provider.clone()));
        }
        items.push(("top-k".to_string(), self.retrieval.top_k.to_string()));

        items
    }
}

fn normalize_key(key: &str) -> String {
    key.to_lowercase().replace('_', "-")
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Mask API key for display (show first 4 and last 4 characters)
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        return "*".repeat(key.len());
    }
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}
