//! EcoSense Service - Telemetry poller and HTTP API.
//!
//! Run with: `cargo run -p ecosense-service`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use ecosense_core::{ForecastClient, TelemetryClient};
use ecosense_service::{AppState, Config, Prefs, api, prefs, runner};

/// EcoSense Service - Telemetry poller and HTTP REST API.
#[derive(Parser, Debug)]
#[command(name = "ecosense-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    bind: Option<String>,

    /// Start in demo mode regardless of the saved preference.
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ecosense_service=info".parse()?)
                .add_directive("ecosense_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    config.validate()?;

    let telemetry = TelemetryClient::new(&config.telemetry.url)
        .context("invalid telemetry URL in configuration")?;
    let forecast = ForecastClient::new(&config.forecast.url)
        .context("invalid forecast URL in configuration")?;

    // Demo mode: CLI flag wins, otherwise the saved preference.
    let prefs_path = prefs::default_prefs_path();
    let demo = args.demo || Prefs::load(&prefs_path).demo_mode;

    let state = AppState::new(config.clone(), Arc::new(telemetry), Arc::new(forecast), prefs_path);

    runner::start(&state, demo).await;
    info!(demo, "started background runner");

    let app = Router::new()
        .merge(api::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = config.server.bind.parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
