//! Service configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Remote telemetry store settings.
    pub telemetry: TelemetryConfig,
    /// Weather forecast endpoint settings.
    pub forecast: ForecastConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration.
    ///
    /// Checks that the bind address parses as host:port, both endpoint URLs
    /// are HTTP(S), and the poll interval is within sane bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            errors.push(ValidationError {
                field: "server.bind".to_string(),
                message: format!("'{}' is not a valid host:port address", self.server.bind),
            });
        }

        for (field, url) in [
            ("telemetry.url", &self.telemetry.url),
            ("forecast.url", &self.forecast.url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                errors.push(ValidationError {
                    field: field.to_string(),
                    message: format!("'{url}' must start with http:// or https://"),
                });
            }
        }

        // Observed deployments poll every 10s to 180s; anything outside
        // 1s-1h is a configuration mistake.
        if !(1..=3600).contains(&self.telemetry.poll_interval) {
            errors.push(ValidationError {
                field: "telemetry.poll_interval".to_string(),
                message: format!(
                    "{} is outside valid range (1-3600 seconds)",
                    self.telemetry.poll_interval
                ),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for the API server.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Remote telemetry store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Full snapshot endpoint URL.
    pub url: String,
    /// Poll interval in seconds.
    pub poll_interval: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            url: "https://ecosense-default-rtdb.firebaseio.com/readings.json".to_string(),
            poll_interval: 180,
        }
    }
}

/// Weather forecast endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Forecast URL; must request `current_weather`.
    pub url: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            url: "https://api.open-meteo.com/v1/forecast?latitude=12.76&longitude=75.20&current_weather=true"
                .to_string(),
        }
    }
}

/// Default configuration file path: `~/.config/ecosense/server.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ecosense")
        .join("server.toml")
}

/// A single validation failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The offending field, e.g. `telemetry.poll_interval`.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to write config to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Invalid configuration: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.telemetry.poll_interval, 180);
    }

    #[test]
    fn test_validate_rejects_bad_bind() {
        let mut config = Config::default();
        config.server.bind = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_urls_and_interval() {
        let mut config = Config::default();
        config.telemetry.url = "readings.json".to_string();
        config.telemetry.poll_interval = 0;

        let err = config.validate().unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().any(|e| e.field == "telemetry.url"));
                assert!(errors.iter().any(|e| e.field == "telemetry.poll_interval"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");

        let mut config = Config::default();
        config.telemetry.poll_interval = 60;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.telemetry.poll_interval, 60);
        assert_eq!(loaded.server.bind, config.server.bind);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("[telemetry]\npoll_interval = 10\n").unwrap();
        assert_eq!(config.telemetry.poll_interval, 10);
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert!(config.forecast.url.contains("current_weather=true"));
    }
}
