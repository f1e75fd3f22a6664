mod config;
mod error;
mod form;
mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::config::{ServerArgs, ServerConfig};

#[derive(Parser)]
#[command(
    name = "stencil-server",
    about = "HTTP service that turns an image into a printable multi-page stencil",
    version
)]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Arc::new(ServerConfig::from_args(cli.server)?);
    let app = routes::router(config.clone());

    info!(
        "listening on http://{} (origins={:?}, max_canvas_pixels={}, max_pages={}, max_upload_bytes={}, strict_filters={})",
        config.bind,
        config.allowed_origins,
        config.limits.max_canvas_pixels,
        config.limits.max_pages,
        config.max_upload_bytes,
        config.strict_filters
    );

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    axum::serve(listener, app).await?;
    Ok(())
}
