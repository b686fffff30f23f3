//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.storyforge.toml` files. API keys are not part of the file; they come
//! from the environment (see [`crate::cli::Args`]).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".storyforge.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Settings for `--serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP router listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// LLM provider endpoints, models and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gradient chat-completions endpoint.
    #[serde(default = "default_gradient_url")]
    pub gradient_url: String,

    /// Gradient models, tried in order.
    #[serde(default = "default_gradient_models")]
    pub gradient_models: Vec<String>,

    /// Anthropic Messages endpoint.
    #[serde(default = "default_anthropic_url")]
    pub anthropic_url: String,

    /// Model requested from Anthropic.
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,

    /// Value of the `anthropic-version` header.
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,

    /// Maximum tokens in a response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gradient_url: default_gradient_url(),
            gradient_models: default_gradient_models(),
            anthropic_url: default_anthropic_url(),
            anthropic_model: default_anthropic_model(),
            anthropic_version: default_anthropic_version(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_gradient_url() -> String {
    "https://inference.do-ai.run/v1/chat/completions".to_string()
}

fn default_gradient_models() -> Vec<String> {
    vec!["anthropic-claude-4.6-sonnet", "llama3.3-70b-instruct"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_anthropic_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-6-20250514".to_string()
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout() -> u64 {
    120
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref bind) = args.bind {
            self.server.bind = bind.clone();
        }

        if let Some(timeout) = args.timeout {
            self.llm.timeout_seconds = timeout;
        }

        if let Some(ref models) = args.gradient_models {
            self.llm.gradient_models = models
                .iter()
                .map(|m| m.trim())
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
