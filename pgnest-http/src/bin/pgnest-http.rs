use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pgnest_core::config::{self, AppConfig, SecretConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// PGNest HTTP API Server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, env = "PGNEST_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the JSON secret file (tokens and bootstrap admins)
    #[arg(short, long, env = "PGNEST_SECRET")]
    secret: Option<PathBuf>,

    /// Host address to bind to, overrides the config file
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut app_config: AppConfig = match &cli.config {
        Some(path) => config::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(host) = cli.host {
        app_config.server.host = host;
    }
    if let Some(port) = cli.port {
        app_config.server.port = port;
    }

    let secret: SecretConfig = match &cli.secret {
        Some(path) => config::from_file(path)?,
        None => SecretConfig::default(),
    };
    if secret.tokens.is_empty() {
        info!("No tokens configured, only public endpoints will be usable");
    }

    pgnest_http::start(app_config, secret).await
}
