//! The bounded, time-ordered series of canonical samples.

use time::OffsetDateTime;
use time::macros::format_description;

use ecosense_types::{CanonicalSample, ChartSeries};

/// Maximum number of samples retained in the series.
pub const MAX_SAMPLES: usize = 50;

/// An ordered, bounded collection of canonical samples.
///
/// Remote records arrive in no particular order, so the store re-sorts by
/// timestamp after every mutation rather than trusting insertion order.
///
/// # Invariants
///
/// After any mutation, the samples are sorted ascending by timestamp and
/// there are at most [`MAX_SAMPLES`] of them. When the bound is exceeded,
/// the oldest timestamps are evicted.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    samples: Vec<CanonicalSample>,
}

impl SeriesStore {
    /// Create an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire series with the given candidates.
    ///
    /// Candidates are re-sorted ascending by timestamp and truncated to the
    /// [`MAX_SAMPLES`] most recent by timestamp, not by insertion order.
    pub fn load_full(&mut self, candidates: Vec<CanonicalSample>) {
        self.samples = candidates;
        self.restore_invariants();
    }

    /// Append a single sample, re-sort, and evict the oldest overflow.
    pub fn merge_incremental(&mut self, sample: CanonicalSample) {
        self.samples.push(sample);
        self.restore_invariants();
    }

    fn restore_invariants(&mut self) {
        self.samples.sort_by_key(|s| s.timestamp);
        if self.samples.len() > MAX_SAMPLES {
            let overflow = self.samples.len() - MAX_SAMPLES;
            self.samples.drain(..overflow);
        }
    }

    /// The newest sample, if any.
    #[must_use]
    pub fn latest(&self) -> Option<CanonicalSample> {
        self.samples.last().copied()
    }

    /// The earliest sample with `timestamp >= cutoff`, if any.
    ///
    /// This is the baseline lookup for trend comparisons over a recent
    /// window.
    #[must_use]
    pub fn window_since(&self, cutoff: OffsetDateTime) -> Option<CanonicalSample> {
        self.samples.iter().find(|s| s.timestamp >= cutoff).copied()
    }

    /// Number of stored samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All stored samples, oldest first.
    #[must_use]
    pub fn samples(&self) -> &[CanonicalSample] {
        &self.samples
    }

    /// Project the series into chart-ready parallel vectors with HH:MM
    /// labels, oldest first.
    #[must_use]
    pub fn chart_series(&self) -> ChartSeries {
        let format = format_description!("[hour]:[minute]");
        ChartSeries {
            labels: self
                .samples
                .iter()
                .map(|s| s.timestamp.format(&format).unwrap_or_default())
                .collect(),
            temperatures: self.samples.iter().map(|s| s.temperature_c).collect(),
            humidities: self.samples.iter().map(|s| s.humidity_pct).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    fn sample_at(minutes: i64) -> CanonicalSample {
        let base = datetime!(2024-06-01 12:00:00 UTC);
        CanonicalSample::builder(base + Duration::minutes(minutes))
            .temperature(20.0 + minutes as f64 * 0.1)
            .humidity(50.0)
            .build()
    }

    fn assert_sorted(store: &SeriesStore) {
        let samples = store.samples();
        assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_load_full_sorts_out_of_order_input() {
        let mut store = SeriesStore::new();
        store.load_full(vec![sample_at(30), sample_at(0), sample_at(15)]);

        assert_eq!(store.len(), 3);
        assert_sorted(&store);
        assert_eq!(store.latest().unwrap().timestamp, sample_at(30).timestamp);
    }

    #[test]
    fn test_load_full_keeps_latest_fifty_by_timestamp() {
        let mut store = SeriesStore::new();
        // 60 samples in scrambled order: newest half interleaved with oldest.
        let mut candidates: Vec<_> = (0..60).map(sample_at).collect();
        candidates.reverse();
        store.load_full(candidates);

        assert_eq!(store.len(), MAX_SAMPLES);
        assert_sorted(&store);
        // The 10 oldest timestamps (minutes 0-9) were evicted.
        assert_eq!(store.samples()[0].timestamp, sample_at(10).timestamp);
        assert_eq!(store.latest().unwrap().timestamp, sample_at(59).timestamp);
    }

    #[test]
    fn test_merge_incremental_evicts_from_front() {
        let mut store = SeriesStore::new();
        store.load_full((0..50).map(sample_at).collect());

        store.merge_incremental(sample_at(100));

        assert_eq!(store.len(), MAX_SAMPLES);
        assert_sorted(&store);
        assert_eq!(store.samples()[0].timestamp, sample_at(1).timestamp);
        assert_eq!(store.latest().unwrap().timestamp, sample_at(100).timestamp);
    }

    #[test]
    fn test_merge_incremental_places_out_of_order_sample() {
        let mut store = SeriesStore::new();
        store.load_full(vec![sample_at(0), sample_at(20)]);

        // Arrives late but belongs in the middle.
        store.merge_incremental(sample_at(10));

        assert_sorted(&store);
        assert_eq!(store.samples()[1].timestamp, sample_at(10).timestamp);
    }

    #[test]
    fn test_window_since_returns_earliest_at_or_after_cutoff() {
        let mut store = SeriesStore::new();
        store.load_full(vec![sample_at(0), sample_at(10), sample_at(20)]);

        let cutoff = sample_at(5).timestamp;
        let found = store.window_since(cutoff).unwrap();
        assert_eq!(found.timestamp, sample_at(10).timestamp);

        let too_late = sample_at(30).timestamp;
        assert!(store.window_since(too_late).is_none());
    }

    #[test]
    fn test_latest_on_empty_series() {
        let store = SeriesStore::new();
        assert!(store.latest().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_chart_series_parallel_vectors() {
        let mut store = SeriesStore::new();
        store.load_full(vec![sample_at(0), sample_at(30)]);

        let chart = store.chart_series();
        assert_eq!(chart.labels, vec!["12:00", "12:30"]);
        assert_eq!(chart.temperatures.len(), 2);
        assert_eq!(chart.humidities.len(), 2);
        assert!((chart.temperatures[1] - 23.0).abs() < 1e-9);
    }
}
