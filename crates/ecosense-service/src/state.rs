//! Application state shared across handlers and the background runner.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use ecosense_core::{Dashboard, ForecastSource, TelemetrySource};

use crate::config::Config;

/// Shared application state.
///
/// The [`Dashboard`] is the single owner of all pipeline state, behind an
/// `RwLock`: handlers take read locks, and only the background runner (and
/// the mode-switch path) takes write locks. Network fetches always happen
/// outside the lock, so a slow endpoint never blocks readers.
pub struct AppState {
    /// The poll-orchestration context.
    pub dashboard: RwLock<Dashboard>,
    /// Source of remote telemetry snapshots.
    pub telemetry: Arc<dyn TelemetrySource>,
    /// Source of weather forecast codes.
    pub forecast: Arc<dyn ForecastSource>,
    /// Service configuration (read-only at runtime).
    pub config: Config,
    /// Where the demo-mode preference is persisted.
    pub prefs_path: PathBuf,
    /// Whether demo mode is currently active.
    demo_mode: AtomicBool,
    /// The currently running poll or demo loop, if any.
    pub(crate) runner: Mutex<Option<JoinHandle<()>>>,
}

impl AppState {
    /// Create new application state with an empty dashboard.
    pub fn new(
        config: Config,
        telemetry: Arc<dyn TelemetrySource>,
        forecast: Arc<dyn ForecastSource>,
        prefs_path: PathBuf,
    ) -> Arc<Self> {
        Arc::new(Self {
            dashboard: RwLock::new(Dashboard::new()),
            telemetry,
            forecast,
            config,
            prefs_path,
            demo_mode: AtomicBool::new(false),
            runner: Mutex::new(None),
        })
    }

    /// Whether demo mode is currently active.
    pub fn demo_mode(&self) -> bool {
        self.demo_mode.load(Ordering::SeqCst)
    }

    pub(crate) fn set_demo_mode(&self, demo: bool) {
        self.demo_mode.store(demo, Ordering::SeqCst);
    }
}
