//! The poll-orchestration context.
//!
//! [`Dashboard`] owns every piece of mutable pipeline state (series, cursor,
//! forecast cache, connection status) as one explicit context object. It is
//! deliberately synchronous: callers fetch from the network themselves and
//! hand the result to [`Dashboard::apply_poll`], so no lock ever needs to be
//! held across a network await and at most one poll's result is applied at a
//! time.

use time::OffsetDateTime;
use tracing::{info, warn};

use ecosense_types::{
    CanonicalSample, ChartSeries, ConnectionStatus, DerivedMetrics, RainReport, RawSnapshot,
};

use crate::error::Error;
use crate::ingest::{IngestOutcome, Ingestor};
use crate::metrics;
use crate::rain::{self, ForecastCache};
use crate::series::SeriesStore;

/// All mutable state of one dashboard instance.
#[derive(Debug)]
pub struct Dashboard {
    ingestor: Ingestor,
    forecast: ForecastCache,
    status: ConnectionStatus,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    /// Create a dashboard in the `Connecting` state with an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ingestor: Ingestor::new(),
            forecast: ForecastCache::new(),
            status: ConnectionStatus::Connecting,
        }
    }

    /// Fold one poll's fetched result into the pipeline and return the new
    /// connection status.
    ///
    /// A transport or decode failure leaves all pipeline state untouched;
    /// the status alone flips to `ConnectionError` and the next tick retries
    /// naturally.
    pub fn apply_poll(
        &mut self,
        fetched: Result<RawSnapshot, Error>,
        now: OffsetDateTime,
    ) -> ConnectionStatus {
        match fetched {
            Ok(snapshot) => {
                let outcome = self.ingestor.ingest(&snapshot, now);
                self.status = match outcome {
                    IngestOutcome::Empty => ConnectionStatus::NoData,
                    IngestOutcome::Loaded(_)
                    | IngestOutcome::Appended { .. }
                    | IngestOutcome::NoNewData => self.live_status(),
                };
                if let IngestOutcome::Loaded(n) = outcome {
                    info!(samples = n, "telemetry feed is live");
                }
            }
            Err(e) => {
                warn!(error = %e, "telemetry poll failed");
                self.status = ConnectionStatus::ConnectionError;
            }
        }
        self.status
    }

    fn live_status(&self) -> ConnectionStatus {
        match self.series().latest() {
            Some(latest) => ConnectionStatus::Live {
                last_update: latest.timestamp,
                samples: self.series().len(),
            },
            None => ConnectionStatus::NoData,
        }
    }

    /// Whether the forecast cache is due for a refresh at `now`.
    #[must_use]
    pub fn needs_forecast_refresh(&self, now: OffsetDateTime) -> bool {
        self.forecast.needs_refresh(now)
    }

    /// Record a freshly fetched weather code. On fetch failure, simply do
    /// not call this; the stale cached value keeps serving.
    pub fn record_forecast(&mut self, code: i32, now: OffsetDateTime) {
        self.forecast.record(code, now);
    }

    /// The combined rain assessment from the cached forecast and the local
    /// series trend.
    #[must_use]
    pub fn rain_report(&self) -> RainReport {
        rain::assess(&self.forecast, self.series())
    }

    /// The newest sample, if any.
    #[must_use]
    pub fn latest_sample(&self) -> Option<CanonicalSample> {
        self.series().latest()
    }

    /// Chart-ready projection of the series.
    #[must_use]
    pub fn chart_series(&self) -> ChartSeries {
        self.series().chart_series()
    }

    /// Derived metrics for the newest sample, if any.
    #[must_use]
    pub fn derived_metrics(&self) -> Option<DerivedMetrics> {
        self.latest_sample().map(|s| metrics::derive(&s))
    }

    /// Current connection status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// The stored series.
    #[must_use]
    pub fn series(&self) -> &SeriesStore {
        self.ingestor.series()
    }

    /// Replace the series with demo history and mark the feed live.
    pub fn seed_demo(&mut self, history: Vec<CanonicalSample>) {
        self.ingestor.series_mut().load_full(history);
        self.status = self.live_status();
    }

    /// Append one generated demo sample.
    pub fn apply_demo_step(&mut self, sample: CanonicalSample) {
        self.ingestor.series_mut().merge_incremental(sample);
        self.status = self.live_status();
    }

    /// Drop all pipeline state and return to `Connecting`.
    ///
    /// Called on a mode switch so the next live poll performs a fresh full
    /// history load.
    pub fn reset(&mut self) {
        self.ingestor.reset();
        self.status = ConnectionStatus::Connecting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecosense_types::RainRisk;
    use time::macros::datetime;

    fn now() -> OffsetDateTime {
        datetime!(2024-06-01 12:00:00 UTC)
    }

    fn snapshot(json: &str) -> RawSnapshot {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_starts_connecting() {
        let dashboard = Dashboard::new();
        assert_eq!(dashboard.status(), ConnectionStatus::Connecting);
        assert!(dashboard.latest_sample().is_none());
    }

    #[test]
    fn test_successful_poll_goes_live() {
        let mut dashboard = Dashboard::new();
        let snap = snapshot(
            r#"{"a": {"timestamp": 1700000000000, "temperature": 22.0, "humidity": 48.0}}"#,
        );

        let status = dashboard.apply_poll(Ok(snap), now());
        match status {
            ConnectionStatus::Live { samples, .. } => assert_eq!(samples, 1),
            other => panic!("expected live status, got {other:?}"),
        }
        assert!(dashboard.derived_metrics().is_some());
    }

    #[test]
    fn test_empty_snapshot_is_no_data_not_error() {
        let mut dashboard = Dashboard::new();
        let status = dashboard.apply_poll(Ok(RawSnapshot::new()), now());
        assert_eq!(status, ConnectionStatus::NoData);
    }

    #[test]
    fn test_failed_poll_preserves_series() {
        let mut dashboard = Dashboard::new();
        let snap = snapshot(
            r#"{"a": {"timestamp": 1700000000000, "temperature": 22.0, "humidity": 48.0}}"#,
        );
        dashboard.apply_poll(Ok(snap), now());
        let latest_before = dashboard.latest_sample();

        let status = dashboard.apply_poll(Err(Error::Status(503)), now());
        assert_eq!(status, ConnectionStatus::ConnectionError);
        assert_eq!(dashboard.latest_sample(), latest_before);

        // A later successful poll recovers.
        let again = snapshot(
            r#"{"a": {"timestamp": 1700000000000, "temperature": 22.0, "humidity": 48.0}}"#,
        );
        let status = dashboard.apply_poll(Ok(again), now());
        assert!(matches!(status, ConnectionStatus::Live { .. }));
    }

    #[test]
    fn test_no_new_data_keeps_live_status() {
        let mut dashboard = Dashboard::new();
        let snap = snapshot(
            r#"{"a": {"timestamp": 1700000000000, "temperature": 22.0, "humidity": 48.0}}"#,
        );
        dashboard.apply_poll(Ok(snap.clone()), now());
        let status = dashboard.apply_poll(Ok(snap), now());
        assert!(matches!(status, ConnectionStatus::Live { .. }));
    }

    #[test]
    fn test_rain_report_before_forecast_refresh() {
        let dashboard = Dashboard::new();
        let report = dashboard.rain_report();
        assert_eq!(report.risk, RainRisk::LowRisk);
        assert_eq!(report.forecast, "Forecast: Unavailable");
        assert!(dashboard.needs_forecast_refresh(now()));
    }

    #[test]
    fn test_forecast_recording_feeds_rain_report() {
        let mut dashboard = Dashboard::new();
        dashboard.record_forecast(61, now());
        assert!(!dashboard.needs_forecast_refresh(now()));

        let report = dashboard.rain_report();
        assert_eq!(report.risk, RainRisk::ModerateRisk);
        assert_eq!(report.forecast, "Forecast: Rain Predicted");
    }

    #[test]
    fn test_demo_seed_and_step() {
        let mut dashboard = Dashboard::new();
        let mut sim = crate::simulate::Simulator::new();
        dashboard.seed_demo(sim.seed_history(now()));
        assert!(matches!(dashboard.status(), ConnectionStatus::Live { .. }));

        let before = dashboard.series().len();
        dashboard.apply_demo_step(sim.step(now()));
        assert_eq!(dashboard.series().len(), before + 1);
    }

    #[test]
    fn test_reset_forces_fresh_full_load() {
        let mut dashboard = Dashboard::new();
        let snap = snapshot(
            r#"{"a": {"timestamp": 1700000000000, "temperature": 22.0, "humidity": 48.0}}"#,
        );
        dashboard.apply_poll(Ok(snap.clone()), now());

        dashboard.reset();
        assert_eq!(dashboard.status(), ConnectionStatus::Connecting);
        assert!(dashboard.latest_sample().is_none());

        let status = dashboard.apply_poll(Ok(snap), now());
        assert!(matches!(status, ConnectionStatus::Live { samples: 1, .. }));
    }
}
