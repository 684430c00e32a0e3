//! Incremental snapshot ingestion: cursor tracking and burst averaging.
//!
//! The remote store has no delta query; every poll re-fetches the full
//! dataset. The [`Ingestor`] keeps a high-water-mark cursor (the maximum
//! native-unit timestamp folded in so far) so only genuinely new records are
//! processed, and folds each poll's burst of new readings into a single
//! averaged sample so an irregular polling cadence does not produce a
//! stepped, undersampled chart.
//!
//! Cursor comparisons happen in the record's native unit, not the corrected
//! instant, to avoid unit-conversion drift across polls. A record without a
//! native timestamp counts as 0 and is therefore never "newer" once a cursor
//! exists.

use time::OffsetDateTime;
use tracing::{debug, info};

use ecosense_types::{CanonicalSample, RawSnapshot};

use crate::normalize::{correct_timestamp, normalize_record, normalize_snapshot};
use crate::series::SeriesStore;

/// What a single ingested snapshot did to the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// First successful fetch: the series was fully replaced with this many
    /// samples.
    Loaded(usize),
    /// Incremental poll: one averaged sample was appended.
    Appended {
        /// Number of new raw readings folded into the appended sample.
        averaged: usize,
    },
    /// Nothing in the snapshot was newer than the cursor; the series is
    /// untouched.
    NoNewData,
    /// The snapshot was empty or held no usable readings; still waiting for
    /// data.
    Empty,
}

/// Owns the series and the incremental-fetch cursor.
///
/// Created empty; the first snapshot that yields samples performs a full
/// history load, and every later snapshot is folded in incrementally.
#[derive(Debug, Default)]
pub struct Ingestor {
    series: SeriesStore,
    /// Max native-unit timestamp folded into the series so far.
    cursor: Option<i64>,
    /// Set once the initial full load has happened.
    primed: bool,
}

impl Ingestor {
    /// Create an empty ingestor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored series.
    #[must_use]
    pub fn series(&self) -> &SeriesStore {
        &self.series
    }

    /// The series, mutably. Used by the demo-mode generator, which feeds
    /// samples directly instead of going through snapshots.
    pub fn series_mut(&mut self) -> &mut SeriesStore {
        &mut self.series
    }

    /// The current high-water mark in the remote store's native unit.
    #[must_use]
    pub fn cursor(&self) -> Option<i64> {
        self.cursor
    }

    /// Fold one fetched snapshot into the series.
    ///
    /// Dispatches to a full load on the first usable snapshot and to
    /// cursor-filtered averaging afterwards. Never errors; a snapshot with
    /// nothing usable reports [`IngestOutcome::Empty`] or
    /// [`IngestOutcome::NoNewData`] and leaves the series untouched.
    pub fn ingest(&mut self, snapshot: &RawSnapshot, now: OffsetDateTime) -> IngestOutcome {
        if snapshot.is_empty() {
            return IngestOutcome::Empty;
        }
        if self.primed {
            self.apply_incremental(snapshot, now)
        } else {
            self.load_initial(snapshot, now)
        }
    }

    /// Initial history load: normalize everything and replace the series.
    fn load_initial(&mut self, snapshot: &RawSnapshot, now: OffsetDateTime) -> IngestOutcome {
        let samples = normalize_snapshot(snapshot, now);
        if samples.is_empty() {
            // Nothing usable yet; stay unprimed so the next snapshot still
            // gets the full-load treatment.
            return IngestOutcome::Empty;
        }

        self.cursor = snapshot
            .values()
            .filter(|r| r.has_valid_reading())
            .filter_map(|r| r.native_timestamp())
            .max();
        let count = samples.len();
        self.series.load_full(samples);
        self.primed = true;

        info!(samples = count, cursor = ?self.cursor, "loaded initial history");
        IngestOutcome::Loaded(self.series.len())
    }

    /// Incremental poll: average everything newer than the cursor into one
    /// appended sample.
    fn apply_incremental(&mut self, snapshot: &RawSnapshot, now: OffsetDateTime) -> IngestOutcome {
        let cursor = self.cursor.unwrap_or(0);

        let mut fresh: Vec<CanonicalSample> = Vec::new();
        let mut max_native = i64::MIN;
        for record in snapshot.values() {
            let native = record.native_timestamp().unwrap_or(0);
            if native <= cursor {
                continue;
            }
            let samples = normalize_record(record, now);
            if samples.is_empty() {
                continue;
            }
            fresh.extend(samples);
            max_native = max_native.max(native);
        }

        if fresh.is_empty() {
            debug!(cursor, "poll found no records newer than cursor");
            return IngestOutcome::NoNewData;
        }

        let count = fresh.len();
        let n = count as f64;
        let averaged = CanonicalSample::builder(correct_timestamp(max_native, now))
            .temperature(fresh.iter().map(|s| s.temperature_c).sum::<f64>() / n)
            .humidity(fresh.iter().map(|s| s.humidity_pct).sum::<f64>() / n)
            .signal_strength(fresh.iter().map(|s| s.signal_strength).sum::<f64>() / n)
            .sample_count(count as u32)
            .build();

        self.series.merge_incremental(averaged);
        self.cursor = Some(max_native);

        debug!(averaged = count, cursor = max_native, "appended averaged sample");
        IngestOutcome::Appended { averaged: count }
    }

    /// Drop all state: empty series, no cursor, next snapshot does a full
    /// load again. Used when switching data sources.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
