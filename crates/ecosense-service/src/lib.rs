//! HTTP service for the EcoSense environmental dashboard.
//!
//! This crate provides a service that:
//! - Polls a remote telemetry store on a schedule
//! - Normalizes snapshots into a bounded in-memory series
//! - Exposes a REST API for the rendering layer
//! - Supports a self-contained demo mode with simulated data
//!
//! # REST API Endpoints
//!
//! - `GET /api/health` - Service health check
//! - `GET /api/current` - Latest canonical sample
//! - `GET /api/chart` - Chart-ready series projection
//! - `GET /api/metrics` - Derived metrics for the latest sample
//! - `GET /api/rain` - Rain-risk assessment
//! - `GET /api/status` - Telemetry connection status
//! - `GET /api/mode` / `PUT /api/mode` - Read or switch demo mode
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/ecosense/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [telemetry]
//! url = "https://example-rtdb.firebaseio.com/readings.json"
//! poll_interval = 180
//!
//! [forecast]
//! url = "https://api.open-meteo.com/v1/forecast?latitude=12.76&longitude=75.20&current_weather=true"
//! ```

pub mod api;
pub mod config;
pub mod prefs;
pub mod runner;
pub mod state;

pub use config::{Config, ConfigError, ForecastConfig, ServerConfig, TelemetryConfig};
pub use prefs::Prefs;
pub use state::AppState;
