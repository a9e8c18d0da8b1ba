//! Spyglass - transparent interception proxy for the game wire protocol.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (listen 0.0.0.0:8123, forward to 127.0.0.1:8124)
//! spyglass
//!
//! # Explicit config file and endpoint overrides
//! spyglass --config spyglass.toml --remote game.example.net:8123
//! ```
//!
//! Packet renderings go to stdout; operational logs go to stderr so the
//! observation stream stays machine-readable.

mod server;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use spyglass_core::ProxyConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Transparent interception proxy for the game wire protocol
#[derive(Parser, Debug)]
#[command(name = "spyglass")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "spyglass.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Override the listen endpoint
    #[arg(long)]
    listen: Option<String>,

    /// Override the upstream endpoint
    #[arg(long)]
    remote: Option<String>,

    /// Disable ANSI colour in packet output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let mut config = load_config(&cli.config)?;
    if let Some(listen) = cli.listen {
        config.listen_address = listen;
    }
    if let Some(remote) = cli.remote {
        config.remote_address = remote;
    }
    config.validate()?;

    let colour = !cli.no_color && std::io::stdout().is_terminal();
    server::run(config, colour).await
}

fn load_config(path: &Path) -> Result<ProxyConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(ProxyConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Initialize the tracing subscriber on stderr
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}
