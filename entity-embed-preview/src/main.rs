//! Entity embed preview server.
//!
//! Serves rendered previews of `<drupal-entity>` markers to the editor.
//!
//! Usage:
//!   entity-embed-preview --config preview.toml --bind 0.0.0.0:8080

use anyhow::{Context, Result};
use clap::Parser;
use entity_embed_preview::{PreviewService, ServerConfig, build_router};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "entity-embed-preview")]
#[command(about = "Preview rendering service for embedded entities")]
struct Args {
    /// Path to the server config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the config
    #[arg(short, long)]
    bind: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let service = Arc::new(
        PreviewService::from_config(&config).context("Failed to build preview service")?,
    );
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!(bind = %config.bind, "Preview service listening");

    axum::serve(listener, build_router(service))
        .await
        .context("HTTP server failed")?;
    Ok(())
}
