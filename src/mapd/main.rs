//! Map service for the village visitation archive.
//!
//! Serves categorised markers, filters, search suggestions and year-grouped
//! records to the map front end, and forwards admin edits to the archive API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use kanahcian::api::ApiClient;
use kanahcian::config::{Config, API_URL_ENV};
use kanahcian::server::{create_router, AppState};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "mapd")]
#[command(about = "Village map service")]
struct Args {
    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Archive API base URL
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::resolve(args.config.as_deref(), args.api_url)?;
    let listen = args.listen.unwrap_or_else(|| config.server.listen.clone());

    info!("Kanahcian Map Service");
    info!("Archive API at {}", config.api.base_url);

    let client = ApiClient::from_config(&config).context("Failed to build API client")?;
    let state = Arc::new(AppState::new(client));

    // The front end can trigger /v1/reload once the archive is reachable
    if let Err(e) = state.reload().await {
        warn!("Initial location load failed: {}", e);
    }

    let app = create_router(state);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind {}", listen))?;
    axum::serve(listener, app).await?;

    Ok(())
}
