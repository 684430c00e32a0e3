//! The canonical time-series sample.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ValidationError;

/// Battery voltage assumed when a raw record carries no voltage field, in
/// millivolts. Matches a full-ish single-cell Li-ion pack at rest.
pub const DEFAULT_BATTERY_MV: u32 = 3300;

/// Epoch milliseconds of 2000-01-01T00:00:00Z.
///
/// Raw native timestamps below this value cannot be a millisecond instant in
/// this system's lifetime and are interpreted as seconds.
pub const EPOCH_2000_MS: i64 = 946_684_800_000;

/// One normalized reading in the time series.
///
/// Every sample in the series has passed validity filtering: the
/// (temperature, humidity) pair is never the all-zero sensor error marker,
/// and `timestamp` is always a concrete instant (wall clock at normalization
/// time when the raw record carried none).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSample {
    /// Temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Relative humidity percentage.
    pub humidity_pct: f64,
    /// Battery voltage in millivolts ([`DEFAULT_BATTERY_MV`] when the raw
    /// shape carries none).
    pub battery_mv: u32,
    /// The unit-corrected capture instant.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// WiFi signal strength in dBm (0 when not reported).
    pub signal_strength: f64,
    /// Number of raw readings averaged into this sample (1 for a direct
    /// conversion, more for a burst folded into one point).
    pub sample_count: u32,
}

impl CanonicalSample {
    /// Create a builder for constructing a `CanonicalSample`.
    pub fn builder(timestamp: OffsetDateTime) -> CanonicalSampleBuilder {
        CanonicalSampleBuilder::new(timestamp)
    }
}

/// Builder for constructing [`CanonicalSample`] with optional fields.
///
/// Use [`build`](Self::build) for unchecked construction, or
/// [`try_build`](Self::try_build) to validate field values.
#[derive(Debug)]
#[must_use]
pub struct CanonicalSampleBuilder {
    sample: CanonicalSample,
}

impl CanonicalSampleBuilder {
    fn new(timestamp: OffsetDateTime) -> Self {
        Self {
            sample: CanonicalSample {
                temperature_c: 0.0,
                humidity_pct: 0.0,
                battery_mv: DEFAULT_BATTERY_MV,
                timestamp,
                signal_strength: 0.0,
                sample_count: 1,
            },
        }
    }

    /// Set temperature in degrees Celsius.
    pub fn temperature(mut self, temperature_c: f64) -> Self {
        self.sample.temperature_c = temperature_c;
        self
    }

    /// Set relative humidity percentage.
    pub fn humidity(mut self, humidity_pct: f64) -> Self {
        self.sample.humidity_pct = humidity_pct;
        self
    }

    /// Set battery voltage in millivolts.
    pub fn battery_mv(mut self, battery_mv: u32) -> Self {
        self.sample.battery_mv = battery_mv;
        self
    }

    /// Set signal strength in dBm.
    pub fn signal_strength(mut self, signal_strength: f64) -> Self {
        self.sample.signal_strength = signal_strength;
        self
    }

    /// Set the number of raw readings averaged into this sample.
    pub fn sample_count(mut self, sample_count: u32) -> Self {
        self.sample.sample_count = sample_count;
        self
    }

    /// Build the `CanonicalSample` without validation.
    #[must_use]
    pub fn build(self) -> CanonicalSample {
        self.sample
    }

    /// Build the `CanonicalSample` with validation.
    ///
    /// Validates:
    /// - `humidity_pct` is within 0-100
    /// - `temperature_c` is within typical sensor range (-40 to 100°C)
    /// - `sample_count` is at least 1
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] if any field has an invalid value.
    pub fn try_build(self) -> Result<CanonicalSample, ValidationError> {
        if !(0.0..=100.0).contains(&self.sample.humidity_pct) {
            return Err(ValidationError::InvalidValue(format!(
                "humidity {} is outside valid range (0-100%)",
                self.sample.humidity_pct
            )));
        }

        if !(-40.0..=100.0).contains(&self.sample.temperature_c) {
            return Err(ValidationError::InvalidValue(format!(
                "temperature {} is outside valid range (-40 to 100°C)",
                self.sample.temperature_c
            )));
        }

        if self.sample.sample_count == 0 {
            return Err(ValidationError::InvalidValue(
                "sample_count must be at least 1".to_string(),
            ));
        }

        Ok(self.sample)
    }
}
