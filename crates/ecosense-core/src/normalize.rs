//! Unit and format normalization of raw remote records.
//!
//! The remote store delivers an unordered mix of record shapes with
//! inconsistent timestamp units (older firmware reports seconds, newer
//! firmware milliseconds). Normalization turns one raw record into zero or
//! more [`CanonicalSample`]s:
//!
//! - Timestamps below [`EPOCH_2000_MS`] are seconds and scaled by 1000.
//! - A missing timestamp falls back to the wall clock at normalization time.
//! - Sensor error markers (temperature and humidity both exactly zero) are
//!   dropped.
//! - Unrecognized shapes yield nothing. Normalization never fails.
//!
//! Policy notes: all points of one batched record share the record's
//! corrected timestamp (no synthetic sub-second spread), and battery voltage
//! defaults to [`DEFAULT_BATTERY_MV`] uniformly whenever the raw shape
//! carries no voltage field.

use time::OffsetDateTime;
use tracing::debug;

use ecosense_types::{
    CanonicalSample, DEFAULT_BATTERY_MV, EPOCH_2000_MS, RawRecord, RawSnapshot,
};

/// Convert a native-unit timestamp into an absolute instant.
///
/// Values below [`EPOCH_2000_MS`] predate this system's lifetime as
/// milliseconds and are interpreted as seconds. A value that still does not
/// convert to a representable instant falls back to `now`.
#[must_use]
pub fn correct_timestamp(native: i64, now: OffsetDateTime) -> OffsetDateTime {
    let millis = if native < EPOCH_2000_MS {
        native.saturating_mul(1000)
    } else {
        native
    };
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).unwrap_or(now)
}

/// Normalize one raw record into canonical samples.
///
/// Total over its input: invalid points are dropped and unknown shapes yield
/// an empty vector, never an error.
#[must_use]
pub fn normalize_record(record: &RawRecord, now: OffsetDateTime) -> Vec<CanonicalSample> {
    match record {
        RawRecord::Batched { timestamp, data } => {
            let ts = timestamp.map_or(now, |t| correct_timestamp(t, now));
            data.iter()
                .filter(|point| point.is_valid())
                .map(|point| {
                    CanonicalSample::builder(ts)
                        .temperature(point.t)
                        .humidity(point.h)
                        .battery_mv(point.v.unwrap_or(DEFAULT_BATTERY_MV))
                        .build()
                })
                .collect()
        }
        RawRecord::Single {
            timestamp,
            temperature,
            humidity,
            rssi,
        } => {
            if *temperature == 0.0 && *humidity == 0.0 {
                return Vec::new();
            }
            let ts = timestamp.map_or(now, |t| correct_timestamp(t, now));
            vec![
                CanonicalSample::builder(ts)
                    .temperature(*temperature)
                    .humidity(*humidity)
                    .signal_strength(rssi.unwrap_or(0.0))
                    .build(),
            ]
        }
        RawRecord::Unknown(_) => Vec::new(),
    }
}

/// Normalize an entire snapshot, logging how many records were skipped.
///
/// A skipped record is either an unrecognized shape or an all-zero error
/// marker; both are per-record conditions and never abort the batch.
#[must_use]
pub fn normalize_snapshot(snapshot: &RawSnapshot, now: OffsetDateTime) -> Vec<CanonicalSample> {
    let mut samples = Vec::new();
    let mut skipped = 0usize;

    for (id, record) in snapshot {
        let converted = normalize_record(record, now);
        if converted.is_empty() {
            debug!(record_id = %id, "skipping record with unknown format or no valid readings");
            skipped += 1;
        } else {
            samples.extend(converted);
        }
    }

    if skipped > 0 {
        debug!(skipped, total = snapshot.len(), "snapshot normalization skipped records");
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn now() -> OffsetDateTime {
        datetime!(2024-06-01 12:00:00 UTC)
    }

    #[test]
    fn test_seconds_scale_timestamp_is_multiplied() {
        // One second before 2000-01-01 in seconds scale.
        let ts = correct_timestamp(946_684_799, now());
        assert_eq!(
            ts.unix_timestamp_nanos() / 1_000_000,
            946_684_799i128 * 1000
        );
    }

    #[test]
    fn test_millisecond_scale_timestamp_is_unchanged() {
        let ts = correct_timestamp(946_684_800_001, now());
        assert_eq!(ts.unix_timestamp_nanos() / 1_000_000, 946_684_800_001);
    }

    #[test]
    fn test_batched_record_expands_to_many_samples() {
        let record: RawRecord = serde_json::from_str(
            r#"{"timestamp": 1700000000, "data": [
                {"t": 22.0, "h": 50.0, "v": 3900},
                {"t": 0.0, "h": 0.0},
                {"t": 22.5, "h": 51.0}
            ]}"#,
        )
        .unwrap();

        let samples = normalize_record(&record, now());
        assert_eq!(samples.len(), 2);

        // All points inherit the record's corrected timestamp.
        let expected = correct_timestamp(1_700_000_000, now());
        assert!(samples.iter().all(|s| s.timestamp == expected));

        assert_eq!(samples[0].battery_mv, 3900);
        assert_eq!(samples[1].battery_mv, DEFAULT_BATTERY_MV);
    }

    #[test]
    fn test_single_record_defaults() {
        let record: RawRecord = serde_json::from_str(
            r#"{"timestamp": 1700000000000, "temperature": 21.5, "humidity": 47.0, "rssi": -58}"#,
        )
        .unwrap();

        let samples = normalize_record(&record, now());
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].battery_mv, DEFAULT_BATTERY_MV);
        assert_eq!(samples[0].signal_strength, -58.0);
        assert_eq!(samples[0].sample_count, 1);
    }

    #[test]
    fn test_missing_timestamp_falls_back_to_now() {
        let record: RawRecord =
            serde_json::from_str(r#"{"temperature": 21.5, "humidity": 47.0}"#).unwrap();

        let samples = normalize_record(&record, now());
        assert_eq!(samples[0].timestamp, now());
    }

    #[test]
    fn test_zero_pair_single_record_is_dropped() {
        let record: RawRecord =
            serde_json::from_str(r#"{"temperature": 0.0, "humidity": 0.0, "rssi": -60}"#).unwrap();
        assert!(normalize_record(&record, now()).is_empty());
    }

    #[test]
    fn test_unknown_shape_yields_nothing() {
        let record: RawRecord = serde_json::from_str(r#"{"voltage_only": 3.3}"#).unwrap();
        assert!(normalize_record(&record, now()).is_empty());
    }

    #[test]
    fn test_snapshot_normalization_is_total() {
        let snapshot: RawSnapshot = serde_json::from_str(
            r#"{
                "a": {"timestamp": 1700000000, "data": [{"t": 22.0, "h": 50.0}]},
                "b": {"garbage": [1, 2, 3]},
                "c": {"temperature": 0.0, "humidity": 0.0}
            }"#,
        )
        .unwrap();

        let samples = normalize_snapshot(&snapshot, now());
        assert_eq!(samples.len(), 1);
        assert!(
            samples
                .iter()
                .all(|s| !(s.temperature_c == 0.0 && s.humidity_pct == 0.0))
        );
    }
}
