//! Trait seams over the external data sources.
//!
//! The poll loop and the HTTP handlers talk to these traits rather than to
//! concrete clients, so tests can inject canned snapshots and forecast
//! codes without any network access.

use async_trait::async_trait;

use ecosense_types::RawSnapshot;

use crate::error::Result;

/// A source of full remote telemetry snapshots.
///
/// The remote store has no delta query; every fetch returns the whole
/// dataset (possibly empty).
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch the current full snapshot. An absent or `null` dataset is an
    /// empty snapshot, not an error.
    async fn fetch_snapshot(&self) -> Result<RawSnapshot>;
}

/// A source of current weather codes for the forecast signal.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetch the current numeric weather code.
    async fn fetch_weather_code(&self) -> Result<i32>;
}
