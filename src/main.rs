//! gptsh - an interactive terminal client for the OpenAI completions API.
//!
//! Reads free-text prompts in a readline loop and prints the completion the
//! service returns. `clear`, `help`, `exit` and `quit` are handled locally;
//! everything else goes to the API.

mod config;
mod llm;
mod session;
mod shell;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Password;
use std::process::Command as ProcessCommand;
use tracing_subscriber::EnvFilter;

use config::Config;
use llm::openai::OpenAiClient;
use session::{GenerationParams, Session};

#[derive(Parser)]
#[command(name = "gptsh")]
#[command(author, version, about = "An interactive terminal client for the OpenAI completions API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive shell (the default)
    Shell,
    /// Open configuration file in $EDITOR
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gptsh=info".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config) => handle_config(),
        Some(Commands::Shell) | None => run_shell().await,
    }
}

/// Bootstrap the session and run the interactive shell.
async fn run_shell() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let api_key = resolve_api_key(&config)?;

    let params = GenerationParams::from_config(&config.openai);
    let session = Session::new(params, OpenAiClient::new(api_key));

    shell::run(session).await
}

/// Resolve the API key: config value, then environment, then an interactive
/// hidden prompt.
fn resolve_api_key(config: &Config) -> Result<String> {
    if !config.openai.api_key.is_empty() {
        return Ok(config.openai.api_key.clone());
    }
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            return Ok(key);
        }
    }
    Password::new()
        .with_prompt("OpenAI API key")
        .interact()
        .context("Failed to read API key")
}

/// Handle the config command.
fn handle_config() -> Result<()> {
    let config_path = Config::config_path()?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !config_path.exists() {
        let default_config = Config::default();
        default_config.save()?;
        println!("Created default config at {}", config_path.display());
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = ProcessCommand::new(&editor)
        .arg(&config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        eprintln!("Editor exited with non-zero status");
    }

    Ok(())
}
