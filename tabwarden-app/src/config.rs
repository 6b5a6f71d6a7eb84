use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "gemini")]
    Gemini { model: String },
    #[serde(rename = "openai_compatible")]
    OpenAICompatible { endpoint: String, model: String },
    /// Offline keyword matching; no model calls at all.
    #[serde(rename = "heuristic")]
    Heuristic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    /// Optional; `TABWARDEN_API_KEY` takes precedence when set.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_idle_threshold_secs")]
    pub idle_threshold_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_idle_threshold_secs() -> u64 {
    30
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Config {
    pub fn with_provider(provider: ProviderConfig, api_key: Option<String>) -> Self {
        Self {
            provider,
            api_key,
            idle_threshold_secs: default_idle_threshold_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            data_dir: default_data_dir(),
        }
    }

    pub fn exists() -> bool {
        Path::new(CONFIG_PATH).exists()
    }

    pub fn load() -> Result<Self> {
        let content =
            std::fs::read_to_string(CONFIG_PATH).context("Failed to read config.toml")?;
        toml::from_str(&content).context("Failed to parse config.toml")
    }

    pub fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(CONFIG_PATH, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.idle_threshold_secs == 0 {
            anyhow::bail!("idle_threshold_secs must be positive");
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be positive");
        }
        if let ProviderConfig::OpenAICompatible { endpoint, .. } = &self.provider {
            if endpoint.trim().is_empty() {
                anyhow::bail!("openai_compatible provider needs a non-empty endpoint");
            }
        }
        Ok(())
    }

    pub fn api_key(&self) -> Option<String> {
        std::env::var("TABWARDEN_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn endpoint(&self) -> Option<String> {
        let configured = match &self.provider {
            ProviderConfig::OpenAICompatible { endpoint, .. } => Some(endpoint.clone()),
            _ => None,
        };
        std::env::var("TABWARDEN_LLM_ENDPOINT").ok().or(configured)
    }

    pub fn model(&self) -> Option<String> {
        let configured = match &self.provider {
            ProviderConfig::Gemini { model } => Some(model.clone()),
            ProviderConfig::OpenAICompatible { model, .. } => Some(model.clone()),
            ProviderConfig::Heuristic => return None,
        };
        std::env::var("TABWARDEN_LLM_MODEL").ok().or(configured)
    }
}
