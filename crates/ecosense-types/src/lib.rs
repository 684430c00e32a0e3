//! Platform-agnostic types for EcoSense environmental telemetry.
//!
//! This crate provides the shared data model used by the ingestion pipeline
//! (ecosense-core) and the HTTP service (ecosense-service):
//!
//! - Raw remote record shapes as delivered by the telemetry store
//! - The canonical time-series sample
//! - Derived-metric value types (mold risk, comfort, dew point bundle)
//! - Status and rain-risk report types for the rendering layer
//!
//! # Example
//!
//! ```
//! use ecosense_types::{RawRecord, RawSnapshot};
//!
//! let json = r#"{"-Na1": {"temperature": 22.5, "humidity": 48.0}}"#;
//! let snapshot: RawSnapshot = serde_json::from_str(json).unwrap();
//! assert!(snapshot["-Na1"].has_valid_reading());
//! ```

pub mod derived;
pub mod error;
pub mod raw;
pub mod report;
pub mod sample;

pub use derived::{Comfort, ComfortLevel, DerivedMetrics, MoldRisk};
pub use error::{ValidationError, ValidationResult};
pub use raw::{RawPoint, RawRecord, RawSnapshot};
pub use report::{ChartSeries, ConnectionStatus, RainReport, RainRisk};
pub use sample::{CanonicalSample, CanonicalSampleBuilder, DEFAULT_BATTERY_MV, EPOCH_2000_MS};
