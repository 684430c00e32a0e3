//! Background data loops and mode switching.
//!
//! Exactly one loop runs at a time: either the live poll loop (fetch the
//! remote snapshot on the configured interval and fold it in) or the demo
//! loop (step the sample generator every couple of seconds). Switching
//! modes aborts the old loop before the new one is spawned, under the
//! runner lock, so there is never a window where two loops mutate the
//! series concurrently. Stopping is idempotent.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::interval;
use tracing::{debug, info};

use ecosense_core::Simulator;

use crate::state::AppState;

/// Spacing between generated samples in demo mode.
pub const DEMO_STEP_INTERVAL: Duration = Duration::from_secs(2);

/// Start the loop for the requested mode, stopping any previous loop first.
///
/// The dashboard is reset on every switch so the next live poll performs a
/// fresh full history load, and demo mode starts from freshly seeded
/// history.
pub async fn start(state: &Arc<AppState>, demo: bool) {
    let mut runner = state.runner.lock().await;
    if let Some(old) = runner.take() {
        old.abort();
        debug!("stopped previous data loop");
    }

    {
        let mut dashboard = state.dashboard.write().await;
        dashboard.reset();
    }

    let handle = if demo {
        let mut simulator = Simulator::new();
        let history = simulator.seed_history(OffsetDateTime::now_utc());
        state.dashboard.write().await.seed_demo(history);
        info!("starting demo loop");
        tokio::spawn(demo_loop(Arc::clone(state), simulator))
    } else {
        info!(
            interval_secs = state.config.telemetry.poll_interval,
            "starting live poll loop"
        );
        tokio::spawn(live_loop(Arc::clone(state)))
    };

    *runner = Some(handle);
    state.set_demo_mode(demo);
}

/// Stop whichever loop is running. Safe to call when nothing runs.
pub async fn stop(state: &Arc<AppState>) {
    if let Some(handle) = state.runner.lock().await.take() {
        handle.abort();
        info!("stopped data loop");
    }
}

/// Poll the remote telemetry store forever.
///
/// The first tick fires immediately, then every configured interval. The
/// fetch happens outside the dashboard lock; only applying the result takes
/// the write lock, briefly.
async fn live_loop(state: Arc<AppState>) {
    let mut ticker = interval(Duration::from_secs(state.config.telemetry.poll_interval));

    loop {
        ticker.tick().await;

        let fetched = state.telemetry.fetch_snapshot().await;
        let now = OffsetDateTime::now_utc();
        let status = state.dashboard.write().await.apply_poll(fetched, now);
        debug!(%status, "poll applied");
    }
}

/// Step the sample generator forever.
async fn demo_loop(state: Arc<AppState>, mut simulator: Simulator) {
    let mut ticker = interval(DEMO_STEP_INTERVAL);
    // The seeded history is already on display; skip the immediate tick.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let sample = simulator.step(OffsetDateTime::now_utc());
        state.dashboard.write().await.apply_demo_step(sample);
    }
}
