//! Status and report types exposed to the rendering layer.

use core::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Connection status of the live telemetry feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Startup: the first fetch has not settled yet.
    Connecting,
    /// The last poll succeeded and data is flowing.
    Live {
        /// Timestamp of the newest sample in the series.
        #[serde(with = "time::serde::rfc3339")]
        last_update: OffsetDateTime,
        /// Number of samples currently held in the series.
        samples: usize,
    },
    /// The remote store answered but holds no records yet.
    NoData,
    /// The last poll failed at the transport or decode layer.
    ConnectionError,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connecting => write!(f, "Connecting..."),
            ConnectionStatus::Live { samples, .. } => {
                write!(f, "Live ({samples} samples)")
            }
            ConnectionStatus::NoData => write!(f, "Waiting for data..."),
            ConnectionStatus::ConnectionError => write!(f, "Connection Error"),
        }
    }
}

/// Combined rain-risk label from the forecast and local-trend signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RainRisk {
    /// Forecast predicts rain and the local trend confirms it.
    HighRisk,
    /// Forecast predicts rain but local conditions are stable.
    ModerateRisk,
    /// Local humidity/temperature trend looks pre-rain despite a dry
    /// forecast.
    LocalSpike,
    /// Neither signal fires.
    LowRisk,
}

impl fmt::Display for RainRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RainRisk::HighRisk => write!(f, "HIGH RISK"),
            RainRisk::ModerateRisk => write!(f, "Moderate Risk"),
            RainRisk::LocalSpike => write!(f, "Local Spike"),
            RainRisk::LowRisk => write!(f, "Low Risk"),
        }
    }
}

/// Rain assessment handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RainReport {
    /// The combined risk label.
    pub risk: RainRisk,
    /// Human-readable forecast summary, e.g. "Forecast: Rain Predicted".
    pub forecast: String,
}

/// Chart-ready projection of the series: parallel label and value vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Display-formatted HH:MM labels, oldest first.
    pub labels: Vec<String>,
    /// Temperatures in degrees Celsius, parallel to `labels`.
    pub temperatures: Vec<f64>,
    /// Relative humidities in percent, parallel to `labels`.
    pub humidities: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_rain_risk_display_labels() {
        assert_eq!(RainRisk::HighRisk.to_string(), "HIGH RISK");
        assert_eq!(RainRisk::ModerateRisk.to_string(), "Moderate Risk");
        assert_eq!(RainRisk::LocalSpike.to_string(), "Local Spike");
        assert_eq!(RainRisk::LowRisk.to_string(), "Low Risk");
    }

    #[test]
    fn test_connection_status_serialization() {
        let status = ConnectionStatus::Live {
            last_update: datetime!(2024-06-01 12:00:00 UTC),
            samples: 42,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"state\":\"live\""));
        assert!(json.contains("42"));

        let back: ConnectionStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }

    #[test]
    fn test_connection_status_display() {
        assert_eq!(ConnectionStatus::NoData.to_string(), "Waiting for data...");
        assert_eq!(
            ConnectionStatus::ConnectionError.to_string(),
            "Connection Error"
        );
    }
}
