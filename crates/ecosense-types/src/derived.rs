//! Value types for metrics derived from a canonical sample.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Mold growth risk classification.
///
/// # Ordering
///
/// Variants are ordered by severity: `Low < Medium < High`. This allows
/// threshold comparisons like `if risk >= MoldRisk::Medium { warn!(...) }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoldRisk {
    /// Conditions do not favor mold growth.
    Low,
    /// Warm and somewhat humid; worth watching.
    Medium,
    /// Warm and humid; mold growth is likely.
    High,
}

impl fmt::Display for MoldRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoldRisk::Low => write!(f, "Low"),
            MoldRisk::Medium => write!(f, "Medium"),
            MoldRisk::High => write!(f, "High"),
        }
    }
}

/// Base thermal comfort band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComfortLevel {
    /// Below 18°C.
    Chilly,
    /// 18-26°C.
    Comfortable,
    /// Above 26°C.
    Warm,
}

impl fmt::Display for ComfortLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComfortLevel::Chilly => write!(f, "Chilly"),
            ComfortLevel::Comfortable => write!(f, "Comfortable"),
            ComfortLevel::Warm => write!(f, "Warm"),
        }
    }
}

/// Comfort assessment: a thermal band plus an independent humidity flag.
///
/// The humid flag is orthogonal to the band, so "Chilly & Humid" and
/// "Warm & Humid" are both possible.
///
/// ```
/// use ecosense_types::{Comfort, ComfortLevel};
///
/// let c = Comfort { level: ComfortLevel::Warm, humid: true };
/// assert_eq!(c.to_string(), "Warm & Humid");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comfort {
    /// The base thermal band.
    pub level: ComfortLevel,
    /// Whether relative humidity exceeds the comfort threshold (65%).
    pub humid: bool,
}

impl fmt::Display for Comfort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.humid {
            write!(f, "{} & Humid", self.level)
        } else {
            write!(f, "{}", self.level)
        }
    }
}

/// The full derived-metric bundle for one sample, as handed to the
/// rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Dew point in degrees Celsius (Magnus approximation).
    pub dew_point_c: f64,
    /// Apparent "feels like" temperature in degrees Celsius.
    pub heat_index_c: f64,
    /// Water vapor mass per air volume, in g/m³.
    pub absolute_humidity_g_m3: f64,
    /// Battery charge estimate, 0-100.
    pub battery_percent: f64,
    /// Rough runtime estimate in days (linear heuristic, not a discharge
    /// curve).
    pub days_remaining: i64,
    /// Mold growth risk classification.
    pub mold_risk: MoldRisk,
    /// Comfort assessment.
    pub comfort: Comfort,
}
