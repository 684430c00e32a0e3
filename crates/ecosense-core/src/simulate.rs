//! Demo-mode sample generator.
//!
//! Produces plausible indoor readings without any hardware or network: a
//! seeded block of half-hour-spaced history followed by a gentle random walk
//! for live updates. Generated samples flow through the same series store
//! and read paths as real telemetry.

use rand::Rng;
use time::{Duration, OffsetDateTime};

use ecosense_types::CanonicalSample;

/// Number of history samples generated when demo mode starts.
pub const SEED_HISTORY_LEN: usize = 20;

/// Spacing between seeded history samples.
const SEED_SPACING: Duration = Duration::minutes(30);

/// Random-walk generator of synthetic sensor readings.
///
/// Temperature oscillates around 22°C, humidity around 50%, and the
/// battery drains slowly from a near-full charge.
#[derive(Debug, Clone)]
pub struct Simulator {
    temperature_c: f64,
    humidity_pct: f64,
    battery_mv: f64,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    /// Create a generator at its baseline state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            temperature_c: 22.0,
            humidity_pct: 50.0,
            battery_mv: 4100.0,
        }
    }

    /// Generate [`SEED_HISTORY_LEN`] history samples ending just before
    /// `now`, oldest first, and move the walk to the newest one.
    pub fn seed_history(&mut self, now: OffsetDateTime) -> Vec<CanonicalSample> {
        let mut rng = rand::rng();
        let mut history = Vec::with_capacity(SEED_HISTORY_LEN);

        for i in (1..=SEED_HISTORY_LEN as i64).rev() {
            let phase = i as f64;
            self.temperature_c = 22.0 + phase.sin() * 2.0 + rng.random_range(0.0..1.0);
            self.humidity_pct = 50.0 + phase.cos() * 5.0 + rng.random_range(0.0..1.0);
            self.battery_mv = 4100.0 - phase * 2.0;

            history.push(self.sample_at(now - SEED_SPACING * i as i32));
        }
        history
    }

    /// Advance the random walk one step and return the new sample.
    pub fn step(&mut self, now: OffsetDateTime) -> CanonicalSample {
        let mut rng = rand::rng();
        self.temperature_c += rng.random_range(-0.5..0.5);
        self.humidity_pct = (self.humidity_pct + rng.random_range(-1.0..1.0)).clamp(0.1, 100.0);
        self.battery_mv = (self.battery_mv - 0.1).max(3300.0);
        self.sample_at(now)
    }

    fn sample_at(&self, timestamp: OffsetDateTime) -> CanonicalSample {
        CanonicalSample::builder(timestamp)
            .temperature(self.temperature_c)
            .humidity(self.humidity_pct)
            .battery_mv(self.battery_mv.round() as u32)
            .build()
    }
}
