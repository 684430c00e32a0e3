//! Ingestion pipeline and derived metrics for EcoSense environmental
//! telemetry.
//!
//! The remote store delivers an unordered, multi-shaped, partially-invalid
//! snapshot on every poll. This crate turns that into a clean, deduplicated,
//! time-ordered series and the display values derived from it:
//!
//! - [`normalize`] — unit correction and per-record shape normalization
//! - [`series`] — the bounded, time-ordered sample store
//! - [`ingest`] — the incremental-fetch cursor and burst averaging
//! - [`metrics`] — dew point, heat index, mold risk, and friends
//! - [`rain`] — the two-signal rain-risk estimator
//! - [`client`] — reqwest clients for the telemetry and forecast endpoints
//! - [`simulate`] — the demo-mode sample generator
//! - [`dashboard`] — the context object tying the pipeline together
//!
//! # Example
//!
//! ```
//! use ecosense_core::Dashboard;
//! use ecosense_types::RawSnapshot;
//! use time::OffsetDateTime;
//!
//! let mut dashboard = Dashboard::new();
//! let snapshot: RawSnapshot = serde_json::from_str(
//!     r#"{"-Na1": {"timestamp": 1700000000000, "temperature": 22.5, "humidity": 48.0}}"#,
//! ).unwrap();
//!
//! let status = dashboard.apply_poll(Ok(snapshot), OffsetDateTime::now_utc());
//! assert!(dashboard.latest_sample().is_some());
//! println!("{status}");
//! ```

pub mod client;
pub mod dashboard;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod normalize;
pub mod rain;
pub mod series;
pub mod simulate;
pub mod traits;

pub use client::{ForecastClient, TelemetryClient};
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use ingest::{IngestOutcome, Ingestor};
pub use rain::ForecastCache;
pub use series::{MAX_SAMPLES, SeriesStore};
pub use simulate::Simulator;
pub use traits::{ForecastSource, TelemetrySource};
