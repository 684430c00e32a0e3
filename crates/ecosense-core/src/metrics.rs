//! Derived comfort and health metrics.
//!
//! Pure functions over a canonical sample. Relative humidity of exactly zero
//! never reaches these functions: such samples are the sensor's error marker
//! and are filtered during normalization, so `dew_point` and friends need no
//! guard for `ln(0)`.

use ecosense_types::{CanonicalSample, Comfort, ComfortLevel, DerivedMetrics, MoldRisk};

/// Magnus formula constants for dew point.
const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

/// Battery voltage window for a single-cell Li-ion pack, in millivolts.
const BATTERY_EMPTY_MV: f64 = 3300.0;
const BATTERY_FULL_MV: f64 = 4200.0;

/// Dew point in degrees Celsius via the Magnus approximation.
///
/// `rh` must be in (0, 100]; upstream filtering guarantees this.
#[must_use]
pub fn dew_point(temperature_c: f64, rh: f64) -> f64 {
    let alpha = (MAGNUS_A * temperature_c) / (MAGNUS_B + temperature_c) + (rh / 100.0).ln();
    (MAGNUS_B * alpha) / (MAGNUS_A - alpha)
}

/// Apparent "feels like" temperature in degrees Celsius.
///
/// Below 20°C the Rothfusz regression is not valid and the input
/// temperature is returned unchanged.
#[must_use]
pub fn heat_index(temperature_c: f64, rh: f64) -> f64 {
    if temperature_c < 20.0 {
        return temperature_c;
    }

    // Rothfusz regression coefficients (Celsius form).
    const C1: f64 = -8.784_694_755_56;
    const C2: f64 = 1.611_394_11;
    const C3: f64 = 2.338_548_838_89;
    const C4: f64 = -0.146_116_05;
    const C5: f64 = -0.012_308_094;
    const C6: f64 = -0.016_424_827_777_8;
    const C7: f64 = 0.002_211_732;
    const C8: f64 = 0.000_725_46;
    const C9: f64 = -0.000_003_582;

    let t = temperature_c;
    C1 + C2 * t
        + C3 * rh
        + C4 * t * rh
        + C5 * t * t
        + C6 * rh * rh
        + C7 * t * t * rh
        + C8 * t * rh * rh
        + C9 * t * t * rh * rh
}

/// Water vapor mass per air volume in g/m³.
#[must_use]
pub fn absolute_humidity(temperature_c: f64, rh: f64) -> f64 {
    (6.112 * ((17.67 * temperature_c) / (temperature_c + 243.5)).exp() * rh * 2.1674)
        / (273.15 + temperature_c)
}

/// Battery charge estimate as a percentage, linear over the 3300-4200 mV
/// window, clamped to 0-100.
#[must_use]
pub fn battery_percent(battery_mv: u32) -> f64 {
    ((f64::from(battery_mv) - BATTERY_EMPTY_MV) / (BATTERY_FULL_MV - BATTERY_EMPTY_MV) * 100.0)
        .clamp(0.0, 100.0)
}

/// Rough runtime estimate in days.
///
/// A linear heuristic (five days per percent), not a real Li-ion discharge
/// curve.
#[must_use]
pub fn estimated_days_remaining(battery_percent: f64) -> i64 {
    (battery_percent * 5.0).round() as i64
}

/// Mold growth risk from temperature and humidity.
///
/// The High condition is checked first so it wins when both apply.
#[must_use]
pub fn mold_risk(temperature_c: f64, rh: f64) -> MoldRisk {
    if rh > 75.0 && temperature_c > 25.0 {
        MoldRisk::High
    } else if rh > 60.0 && temperature_c > 20.0 {
        MoldRisk::Medium
    } else {
        MoldRisk::Low
    }
}

/// Comfort assessment: thermal band plus an independent humid flag.
#[must_use]
pub fn comfort(temperature_c: f64, rh: f64) -> Comfort {
    let level = if temperature_c < 18.0 {
        ComfortLevel::Chilly
    } else if temperature_c > 26.0 {
        ComfortLevel::Warm
    } else {
        ComfortLevel::Comfortable
    };
    Comfort {
        level,
        humid: rh > 65.0,
    }
}

/// Compute the full derived-metric bundle for one sample.
#[must_use]
pub fn derive(sample: &CanonicalSample) -> DerivedMetrics {
    let t = sample.temperature_c;
    let rh = sample.humidity_pct;
    let percent = battery_percent(sample.battery_mv);

    DerivedMetrics {
        dew_point_c: dew_point(t, rh),
        heat_index_c: heat_index(t, rh),
        absolute_humidity_g_m3: absolute_humidity(t, rh),
        battery_percent: percent,
        days_remaining: estimated_days_remaining(percent),
        mold_risk: mold_risk(t, rh),
        comfort: comfort(t, rh),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_heat_index_passthrough_below_threshold() {
        assert_eq!(heat_index(15.0, 50.0), 15.0);
        assert_eq!(heat_index(19.9, 90.0), 19.9);
    }

    #[test]
    fn test_heat_index_exceeds_temperature_when_muggy() {
        // Hot and humid should feel hotter than the dry-bulb reading.
        let hi = heat_index(32.0, 80.0);
        assert!(hi > 32.0, "heat index {hi} should exceed 32");
    }

    #[test]
    fn test_dew_point_reference_value() {
        // 20°C at 50% RH dews around 9.3°C.
        let dp = dew_point(20.0, 50.0);
        assert!((dp - 9.3).abs() < 0.2, "dew point was {dp}");

        // Saturated air dews at the air temperature.
        let saturated = dew_point(20.0, 100.0);
        assert!((saturated - 20.0).abs() < 0.05);
    }

    #[test]
    fn test_absolute_humidity_reference_value() {
        // 20°C at 50% RH holds roughly 8.6 g/m³.
        let ah = absolute_humidity(20.0, 50.0);
        assert!((ah - 8.6).abs() < 0.3, "absolute humidity was {ah}");
    }

    #[test]
    fn test_battery_percent_endpoints_and_clamping() {
        assert_eq!(battery_percent(3300), 0.0);
        assert_eq!(battery_percent(4200), 100.0);
        assert_eq!(battery_percent(3000), 0.0);
        assert_eq!(battery_percent(4500), 100.0);
        assert!((battery_percent(3750) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_estimated_days_remaining_is_linear() {
        assert_eq!(estimated_days_remaining(100.0), 500);
        assert_eq!(estimated_days_remaining(0.0), 0);
        assert_eq!(estimated_days_remaining(50.2), 251);
    }

    #[test]
    fn test_mold_risk_thresholds() {
        assert_eq!(mold_risk(26.0, 80.0), MoldRisk::High);
        assert_eq!(mold_risk(21.0, 65.0), MoldRisk::Medium);
        assert_eq!(mold_risk(19.0, 50.0), MoldRisk::Low);
        // High wins when both condition sets apply.
        assert_eq!(mold_risk(30.0, 90.0), MoldRisk::High);
        // Warm but dry is still low risk.
        assert_eq!(mold_risk(30.0, 40.0), MoldRisk::Low);
    }

    #[test]
    fn test_comfort_bands_and_humid_flag() {
        assert_eq!(
            comfort(15.0, 40.0),
            Comfort { level: ComfortLevel::Chilly, humid: false }
        );
        assert_eq!(
            comfort(22.0, 50.0),
            Comfort { level: ComfortLevel::Comfortable, humid: false }
        );
        assert_eq!(
            comfort(28.0, 70.0),
            Comfort { level: ComfortLevel::Warm, humid: true }
        );
        // The humid flag is independent of the band.
        assert_eq!(comfort(15.0, 80.0).to_string(), "Chilly & Humid");
    }

    #[test]
    fn test_derive_bundles_all_metrics() {
        let sample = ecosense_types::CanonicalSample::builder(datetime!(2024-06-01 12:00:00 UTC))
            .temperature(27.0)
            .humidity(78.0)
            .battery_mv(3750)
            .build();

        let metrics = derive(&sample);
        assert_eq!(metrics.mold_risk, MoldRisk::High);
        assert_eq!(metrics.comfort.level, ComfortLevel::Warm);
        assert!(metrics.comfort.humid);
        assert!((metrics.battery_percent - 50.0).abs() < 1e-9);
        assert_eq!(metrics.days_remaining, 250);
        assert!(metrics.heat_index_c > 27.0);
    }
}
