//! Raw record shapes as delivered by the remote telemetry store.
//!
//! The store is a flat JSON object mapping opaque keys to records. Two record
//! shapes have been observed in the wild, depending on firmware generation:
//!
//! - **Batched**: `{ "timestamp": 1700000000, "data": [{ "t": 22.5, "h": 48.0, "v": 3900 }, ...] }`
//! - **Single**: `{ "timestamp": 1700000000000, "temperature": 22.5, "humidity": 48.0, "rssi": -61 }`
//!
//! Anything else is captured as [`RawRecord::Unknown`] and contributes no
//! samples. Deserialization is total: a snapshot with unrecognized records
//! still parses, and the unrecognized entries are simply skipped downstream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A full snapshot of the remote store, keyed by opaque record id.
///
/// `BTreeMap` keeps iteration deterministic; the store itself guarantees no
/// ordering, so every consumer re-sorts by timestamp anyway.
pub type RawSnapshot = BTreeMap<String, RawRecord>;

/// One record from the remote telemetry store, in any of its observed shapes.
///
/// The variants are tried in declaration order: a record with a `data` array
/// is batched, a record with `temperature`/`humidity` fields is single, and
/// everything else falls through to [`RawRecord::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRecord {
    /// Batched firmware format: one upload carrying several buffered points.
    Batched {
        /// Upload timestamp in the sender's native unit (seconds or
        /// milliseconds since epoch; see [`crate::EPOCH_2000_MS`]).
        #[serde(default)]
        timestamp: Option<i64>,
        /// The buffered points, oldest first.
        data: Vec<RawPoint>,
    },
    /// Single-reading firmware format.
    Single {
        /// Capture timestamp in the sender's native unit.
        #[serde(default)]
        timestamp: Option<i64>,
        /// Temperature in degrees Celsius.
        temperature: f64,
        /// Relative humidity percentage.
        humidity: f64,
        /// WiFi signal strength in dBm, when reported.
        #[serde(default)]
        rssi: Option<f64>,
    },
    /// A record matching neither recognized shape. Never an error.
    Unknown(serde_json::Value),
}

/// One buffered point inside a batched record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    /// Temperature in degrees Celsius.
    pub t: f64,
    /// Relative humidity percentage.
    pub h: f64,
    /// Battery voltage in millivolts, when reported.
    #[serde(default)]
    pub v: Option<u32>,
}

impl RawPoint {
    /// Whether this point carries an actual reading.
    ///
    /// The sensor self-reports "no reading" as an all-zero pair.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !(self.t == 0.0 && self.h == 0.0)
    }
}

impl RawRecord {
    /// The record's timestamp in the sender's native unit, if present.
    ///
    /// The native unit is ambiguous (seconds or milliseconds); unit
    /// correction happens during normalization, while incremental-fetch
    /// filtering compares native values directly to avoid conversion drift.
    #[must_use]
    pub fn native_timestamp(&self) -> Option<i64> {
        match self {
            RawRecord::Batched { timestamp, .. } | RawRecord::Single { timestamp, .. } => {
                *timestamp
            }
            RawRecord::Unknown(_) => None,
        }
    }

    /// Whether this record would yield at least one canonical sample.
    ///
    /// Batched records need at least one non-zero point; single records must
    /// not be the all-zero "no reading" pair; unknown records never qualify.
    #[must_use]
    pub fn has_valid_reading(&self) -> bool {
        match self {
            RawRecord::Batched { data, .. } => data.iter().any(RawPoint::is_valid),
            RawRecord::Single {
                temperature,
                humidity,
                ..
            } => !(*temperature == 0.0 && *humidity == 0.0),
            RawRecord::Unknown(_) => false,
        }
    }
}
