//! Marquee: a movie browsing service over an OMDb-style API
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use marquee::{
    config,
    network::HttpClient,
    omdb::OmdbClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "marquee", version)]
#[command(about = "A movie browsing service over an OMDb-style API")]
#[command(after_help = ENV_HELP)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    MARQUEE_SETTINGS_PATH  Path to marquee.yml
    MARQUEE_DEBUG          Enable debug logging (true/false)
    MARQUEE_PORT           Server port
    MARQUEE_BIND_ADDRESS   Bind address
    MARQUEE_OMDB_API_KEY   API key for the movie database
    MARQUEE_OMDB_BASE_URL  Base URL of the movie database
    RUST_LOG               Log filter (overrides MARQUEE_DEBUG)";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let (settings, source_path) = config::load(args.config.as_deref())?;

    // Initialize logging
    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting Marquee v{}", marquee::VERSION);
    match source_path {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    if settings.omdb.api_key.is_empty() {
        warn!("No OMDb API key configured; every lookup will come back empty");
    }

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    debug!("HTTP client user agent: {}", client.user_agent());
    let source = Arc::new(OmdbClient::new(client, &settings.omdb));
    info!("Movie source initialized at {}", settings.omdb.base_url);

    // Create application state
    let state = AppState::new(settings.clone(), source);

    // Seed the grid before any user input
    let (term, update) = state.controller.bootstrap(&mut rand::thread_rng()).await;
    if let Some(view) = update.state() {
        info!("Initial search '{}' returned {} results", term, view.results.len());
    }

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
