//! StoryForge Agent Router
//!
//! Dispatches JSON payloads to the coach, transcript, content and workflow
//! agents. Each agent calls an LLM through a provider fallback chain and
//! falls back to a canned response when every provider fails.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad payload JSON, config, bind failure, etc.)
//!   2 - The router answered with an error payload (unknown agent, bad input)

mod agents;
mod cli;
mod config;
mod llm;
mod models;
mod server;
#[cfg(test)]
mod testing;

use agents::Agent;
use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use llm::{Credentials, LlmClient};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // API keys may come from a .env file in the working directory
    let _ = dotenvy::dotenv();

    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if args.init_config {
        return handle_init_config();
    }

    if args.list_agents {
        for agent in Agent::ALL {
            println!("{:<12} {}", agent.name(), agent.description());
        }
        return Ok(());
    }

    init_logging(&args);

    info!("StoryForge router v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        serve = args.serve,
        config = ?args.config,
        gradient_key = args.gradient_key.is_some(),
        anthropic_key = args.anthropic_key.is_some(),
        "Arguments parsed"
    );

    match run(args).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Router failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .storyforge.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    println!("   API keys are read from GRADIENT_MODEL_ACCESS_KEY and ANTHROPIC_API_KEY.");
    Ok(())
}

/// Initialize logging. Logs go to stderr so stdout carries only JSON.
///
/// `RUST_LOG` wins over the verbosity flags when set.
fn init_logging(args: &Args) {
    let level = args.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Load config, build the LLM client, then serve or route one payload.
/// Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let credentials = Credentials::new(args.gradient_key.clone(), args.anthropic_key.clone());
    if credentials.gradient.is_none() && credentials.anthropic.is_none() {
        warn!("No GRADIENT_MODEL_ACCESS_KEY or ANTHROPIC_API_KEY set; agents will return stub responses");
    }

    let llm = LlmClient::new(&config.llm, credentials)?;

    if args.serve {
        println!("🚀 StoryForge router listening on http://{}", config.server.bind);
        server::serve(&config.server.bind, Arc::new(llm)).await?;
        return Ok(0);
    }

    let raw = args.read_payload()?;
    let payload: Value = serde_json::from_str(&raw).context("Payload is not valid JSON")?;

    let response = agents::route_request(&payload, &llm).await;

    let output = if args.compact {
        serde_json::to_string(&response)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{}", output);

    if agents::is_error(&response) {
        return Ok(2);
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
