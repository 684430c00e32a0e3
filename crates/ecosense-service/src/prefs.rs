//! Persisted user preferences.
//!
//! The dashboard remembers one thing across restarts: whether demo mode was
//! on. Kept separate from the service configuration because it is written by
//! the running service on every toggle, while `server.toml` is operator
//! territory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Persisted preferences.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    /// Whether demo mode was active when last toggled.
    pub demo_mode: bool,
}

impl Prefs {
    /// Load preferences from `path`, falling back to defaults when the file
    /// is missing or unreadable. A corrupt preference file is not worth
    /// failing startup over.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.as_ref().display(), error = %e, "ignoring corrupt prefs file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Write preferences to `path`, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path.as_ref(), content)
    }
}

/// Default preference file path: `~/.config/ecosense/prefs.toml`.
pub fn default_prefs_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ecosense")
        .join("prefs.toml")
}
