//! Health reporting for the `/healthz` endpoint.
//!
//! The ingestion handler holds no state between calls, so the report only
//! carries liveness, uptime and the names of the configured backends.

use std::time::Instant;

use serde::Serialize;

use logvault_core::metrics as m;

/// Health report returned by `GET /healthz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaemonHealth {
    /// Always `"healthy"` while the listener is serving.
    pub status: &'static str,
    /// Daemon uptime in seconds since start.
    pub uptime_secs: u64,
    /// Storage backend name (`fs`, `http`).
    pub store: String,
    /// Notification backend name (`log`, `webhook`).
    pub notifier: String,
}

impl DaemonHealth {
    /// Build a report for a daemon started at `start_time`.
    pub fn new(start_time: Instant, store: &str, notifier: &str) -> Self {
        Self {
            status: "healthy",
            uptime_secs: start_time.elapsed().as_secs(),
            store: store.to_owned(),
            notifier: notifier.to_owned(),
        }
    }
}

/// Record the uptime gauge.
pub fn record_uptime(start_time: Instant) {
    #[allow(clippy::cast_precision_loss)]
    metrics::gauge!(m::DAEMON_UPTIME_SECONDS).set(start_time.elapsed().as_secs() as f64);
}
