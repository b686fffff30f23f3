//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

/// StoryForge agent router
///
/// Dispatches a JSON payload of the form {"agent": "...", "input": {...}}
/// to the coach, transcript, content or workflow agent and prints the result.
///
/// Examples:
///   storyforge-router --payload '{"agent":"coach","input":{"query":"How should I open?"}}'
///   storyforge-router --input request.json
///   cat request.json | storyforge-router --input -
///   storyforge-router --serve --bind 0.0.0.0:8080
///   storyforge-router --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Router payload as an inline JSON string
    #[arg(short, long, value_name = "JSON", conflicts_with = "input")]
    pub payload: Option<String>,

    /// Read the router payload from a file ("-" for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Run as an HTTP service instead of handling a single payload
    #[arg(long, conflicts_with_all = ["payload", "input"])]
    pub serve: bool,

    /// Address to listen on with --serve
    ///
    /// Defaults to the [server] bind value from config, or 127.0.0.1:8080.
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .storyforge.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Gradient model access key
    #[arg(long, env = "GRADIENT_MODEL_ACCESS_KEY", hide_env_values = true)]
    pub gradient_key: Option<String>,

    /// Anthropic API key, used when every Gradient model fails
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_key: Option<String>,

    /// Gradient models to try, in order (comma-separated)
    ///
    /// Example: --gradient-models anthropic-claude-4.6-sonnet,llama3.3-70b-instruct
    #[arg(long, value_name = "MODELS", value_delimiter = ',')]
    pub gradient_models: Option<Vec<String>>,

    /// LLM request timeout in seconds for the transcript and content agents,
    /// overriding `[llm] timeout_seconds`. Coach and workflow always use 60s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print the result as a single line of JSON
    #[arg(long)]
    pub compact: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// List the available agents and exit
    #[arg(long)]
    pub list_agents: bool,

    /// Generate a default .storyforge.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config || self.list_agents {
            return Ok(());
        }

        if self.payload.is_none() && self.input.is_none() && !self.serve {
            return Err("Provide a payload with --payload or --input, or start a service with --serve"
                .to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref models) = self.gradient_models {
            if models.iter().all(|m| m.trim().is_empty()) {
                return Err("--gradient-models needs at least one model name".to_string());
            }
        }

        if let Some(ref input) = self.input {
            if input.as_os_str() != "-" && !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Read the raw payload text from --payload, --input FILE, or stdin.
    pub fn read_payload(&self) -> Result<String> {
        if let Some(ref payload) = self.payload {
            return Ok(payload.clone());
        }

        match self.input {
            Some(ref path) if path.as_os_str() == "-" => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read payload from stdin")?;
                Ok(buf)
            }
            Some(ref path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read payload file: {}", path.display())),
            None => anyhow::bail!("No payload given"),
        }
    }
}
