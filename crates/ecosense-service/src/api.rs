//! REST API endpoints for the EcoSense dashboard.
//!
//! All handlers take read locks on the shared [`Dashboard`]; only the rain
//! endpoint (to record a refreshed forecast) and the mode toggle take write
//! locks, and never across a network await. The rendering layer polls these
//! endpoints and owns all presentation concerns.
//!
//! [`Dashboard`]: ecosense_core::Dashboard

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use ecosense_types::{
    CanonicalSample, ChartSeries, ConnectionStatus, DerivedMetrics, RainReport,
};

use crate::prefs::Prefs;
use crate::runner;
use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/current", get(get_current))
        .route("/api/chart", get(get_chart))
        .route("/api/metrics", get(get_metrics))
        .route("/api/rain", get(get_rain))
        .route("/api/status", get(get_status))
        .route("/api/mode", get(get_mode).put(set_mode))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Latest canonical sample, or `null` before any data has arrived.
async fn get_current(State(state): State<Arc<AppState>>) -> Json<Option<CanonicalSample>> {
    Json(state.dashboard.read().await.latest_sample())
}

/// Chart-ready projection of the stored series.
async fn get_chart(State(state): State<Arc<AppState>>) -> Json<ChartSeries> {
    Json(state.dashboard.read().await.chart_series())
}

/// Derived metrics for the latest sample, or `null` before any data.
async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<Option<DerivedMetrics>> {
    Json(state.dashboard.read().await.derived_metrics())
}

/// Rain-risk assessment.
///
/// Refreshes the forecast cache opportunistically when it is older than the
/// refresh interval. A failed forecast fetch keeps serving the stale cached
/// value; the risk label degrades gracefully rather than erroring.
async fn get_rain(State(state): State<Arc<AppState>>) -> Json<RainReport> {
    let now = OffsetDateTime::now_utc();

    let due = state.dashboard.read().await.needs_forecast_refresh(now);
    if due {
        // Fetch outside any dashboard lock.
        match state.forecast.fetch_weather_code().await {
            Ok(code) => state.dashboard.write().await.record_forecast(code, now),
            Err(e) => warn!(error = %e, "forecast refresh failed; keeping cached value"),
        }
    }

    Json(state.dashboard.read().await.rain_report())
}

/// Connection status of the telemetry feed.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<ConnectionStatus> {
    Json(state.dashboard.read().await.status())
}

/// Demo-mode state payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModeResponse {
    /// Whether demo mode is active.
    pub demo: bool,
}

/// Read the current mode.
async fn get_mode(State(state): State<Arc<AppState>>) -> Json<ModeResponse> {
    Json(ModeResponse {
        demo: state.demo_mode(),
    })
}

/// Switch between live and demo mode and persist the preference.
///
/// A no-op when the requested mode is already active, so repeated toggles
/// do not restart the running loop.
async fn set_mode(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeResponse>,
) -> Json<ModeResponse> {
    if request.demo != state.demo_mode() {
        runner::start(&state, request.demo).await;

        let prefs = Prefs {
            demo_mode: request.demo,
        };
        if let Err(e) = prefs.save(&state.prefs_path) {
            warn!(error = %e, path = %state.prefs_path.display(), "failed to persist demo-mode preference");
        }
    }

    Json(ModeResponse {
        demo: state.demo_mode(),
    })
}
