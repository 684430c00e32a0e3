//! Rain-risk estimation from two independent signals.
//!
//! The estimator combines an external weather forecast (a numeric weather
//! code, refreshed at most every fifteen minutes) with a locally observed
//! pre-rain trend: humidity climbing while temperature falls over the last
//! half hour of stored samples. The two boolean signals map onto four
//! labels; see [`combine`].

use time::{Duration, OffsetDateTime};

use ecosense_types::{CanonicalSample, RainReport, RainRisk};

use crate::series::SeriesStore;

/// Minimum spacing between forecast endpoint queries.
pub const FORECAST_REFRESH_INTERVAL: Duration = Duration::minutes(15);

/// Lookback window for the local trend comparison.
pub const LOCAL_TREND_WINDOW: Duration = Duration::minutes(30);

/// Humidity rise (percentage points) that qualifies as a pre-rain trend.
const TREND_HUMIDITY_RISE: f64 = 5.0;

/// Temperature drop (°C) that qualifies as a pre-rain trend.
const TREND_TEMPERATURE_DROP: f64 = 0.5;

/// Whether a WMO weather code indicates drizzle, rain, or showers.
///
/// Codes 50-67 cover drizzle and rain, 80-99 showers and thunderstorms.
#[must_use]
pub fn is_rainy_code(code: i32) -> bool {
    matches!(code, 50..=67 | 80..=99)
}

/// Cached forecast state, refreshed opportunistically by whoever needs a
/// rain assessment rather than on its own timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastCache {
    code: Option<i32>,
    rain_expected: bool,
    checked_at: Option<OffsetDateTime>,
}

impl ForecastCache {
    /// Create an empty cache; the first query always refreshes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cache is due for a refresh at `now`.
    #[must_use]
    pub fn needs_refresh(&self, now: OffsetDateTime) -> bool {
        self.checked_at
            .is_none_or(|at| now - at > FORECAST_REFRESH_INTERVAL)
    }

    /// Record a freshly fetched weather code.
    ///
    /// A failed fetch should simply not call this; the previous value stays
    /// cached and the next evaluation past the interval retries.
    pub fn record(&mut self, code: i32, now: OffsetDateTime) {
        self.code = Some(code);
        self.rain_expected = is_rainy_code(code);
        self.checked_at = Some(now);
    }

    /// Whether the cached forecast predicts rain. False before the first
    /// successful refresh.
    #[must_use]
    pub fn rain_expected(&self) -> bool {
        self.rain_expected
    }

    /// The cached weather code, if any refresh has succeeded.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Human-readable forecast summary for the rendering layer.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.code {
            None => "Forecast: Unavailable".to_string(),
            Some(_) if self.rain_expected => "Forecast: Rain Predicted".to_string(),
            Some(_) => "Forecast: No Rain Predicted".to_string(),
        }
    }
}

/// Detect the local pre-rain trend against the stored series.
///
/// The baseline is the earliest stored sample within the half-hour window
/// before `current`; the trend fires when humidity rose more than five
/// points AND temperature dropped more than half a degree since then. With
/// no baseline in the window the trend is false.
#[must_use]
pub fn local_trend(series: &SeriesStore, current: &CanonicalSample) -> bool {
    let cutoff = current.timestamp - LOCAL_TREND_WINDOW;
    let Some(baseline) = series.window_since(cutoff) else {
        return false;
    };

    let humidity_rise = current.humidity_pct - baseline.humidity_pct;
    let temperature_drop = baseline.temperature_c - current.temperature_c;
    humidity_rise > TREND_HUMIDITY_RISE && temperature_drop > TREND_TEMPERATURE_DROP
}

/// Combine the two signals into the four-way risk label.
#[must_use]
pub fn combine(forecast_rain: bool, local_trend: bool) -> RainRisk {
    match (forecast_rain, local_trend) {
        (true, true) => RainRisk::HighRisk,
        (true, false) => RainRisk::ModerateRisk,
        (false, true) => RainRisk::LocalSpike,
        (false, false) => RainRisk::LowRisk,
    }
}

/// Build the full rain report for the rendering layer.
///
/// With an empty series the local trend cannot fire and only the forecast
/// signal contributes.
#[must_use]
pub fn assess(cache: &ForecastCache, series: &SeriesStore) -> RainReport {
    let trend = series
        .latest()
        .is_some_and(|current| local_trend(series, &current));
    RainReport {
        risk: combine(cache.rain_expected(), trend),
        forecast: cache.summary(),
    }
}
