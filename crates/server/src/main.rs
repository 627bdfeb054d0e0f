//! paild - pail server binary
//!
//! Serves the bucket file-manager API and the built front-end assets.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pail_core::ConfigManager;
use pail_server::build_router;

/// pail - web file manager for S3-compatible object storage
#[derive(Parser, Debug)]
#[command(name = "paild")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on (overrides the config file)
    #[arg(long)]
    listen: Option<String>,

    /// Path to the configuration file
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Directory holding the built front-end assets (overrides the config file)
    #[arg(long)]
    dist: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let manager = match args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load()?;

    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(dist) = args.dist {
        config.server.dist_dir = dist.to_string_lossy().into_owned();
    }

    let app = build_router(&config.server);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    tracing::info!(listen = %config.server.listen, "paild listening");
    axum::serve(listener, app).await?;

    Ok(())
}
