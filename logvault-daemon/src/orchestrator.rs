//! Daemon assembly and lifecycle management.
//!
//! The [`Orchestrator`] builds the storage and notification backends from
//! configuration, wires them into an [`IngestHandler`], serves the HTTP
//! front end and coordinates graceful shutdown.
//!
//! # Shutdown
//!
//! `SIGTERM` or `SIGINT` cancels the shutdown token. The listener stops
//! accepting connections and in-flight requests run to completion.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use logvault_core::config::LogvaultConfig;
use logvault_ingest::{
    IngestConfig, IngestHandler, Notifier, NotifierBackend, ObjectStore, StoreBackend,
};

use crate::health::record_uptime;
use crate::{metrics_server, server};

/// Interval between uptime gauge updates.
const UPTIME_INTERVAL: Duration = Duration::from_secs(10);

/// The main daemon orchestrator.
pub struct Orchestrator {
    /// Loaded and validated configuration.
    config: LogvaultConfig,
    /// Ingestion handler over the configured backends.
    handler: IngestHandler<StoreBackend, NotifierBackend>,
    /// Cancelled when the daemon should stop.
    shutdown: CancellationToken,
    /// Daemon start time (for uptime reporting).
    start_time: Instant,
}

impl Orchestrator {
    /// Load configuration from `config_path` and build the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or parsed
    /// - Configuration validation fails
    /// - A backend cannot be constructed
    pub async fn build(config_path: &Path) -> Result<Self> {
        let config = LogvaultConfig::load(config_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
        Self::build_from_config(config)
    }

    /// Build from an already-loaded configuration.
    pub fn build_from_config(config: LogvaultConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        let ingest_config = IngestConfig::from_core(&config);
        ingest_config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
        }

        let store = StoreBackend::from_config(&config.storage)
            .map_err(|e| anyhow::anyhow!("failed to build store backend: {}", e))?;
        let notifier = NotifierBackend::from_config(&config.notification)
            .map_err(|e| anyhow::anyhow!("failed to build notifier backend: {}", e))?;

        tracing::info!(
            store = store.name(),
            bucket = %config.storage.bucket,
            notifier = notifier.name(),
            channel = %config.notification.channel,
            "backends initialized"
        );

        Ok(Self {
            handler: IngestHandler::new(store, notifier, ingest_config),
            config,
            shutdown: CancellationToken::new(),
            start_time: Instant::now(),
        })
    }

    /// Token that stops the daemon when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// HTTP router serving this daemon's handler.
    pub fn router(&self) -> Router {
        server::router(
            self.handler.clone(),
            self.config.server.max_body_bytes,
            self.start_time,
        )
    }

    /// Bind the configured address and serve until a shutdown signal.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.server.bind)
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", self.config.server.bind, e))?;
        self.run_with_listener(listener).await
    }

    /// Serve on an already-bound listener until the shutdown token is cancelled
    /// or a shutdown signal arrives.
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr()?;

        let signal_task = spawn_signal_watcher(self.shutdown.clone());
        let uptime_task = self
            .config
            .metrics
            .enabled
            .then(|| spawn_uptime_updater(self.start_time, self.shutdown.clone()));

        tracing::info!(addr = %local_addr, "logvault-daemon listening");
        let result = server::serve(listener, self.router(), self.shutdown.clone()).await;

        self.shutdown.cancel();
        if let Err(e) = signal_task.await {
            tracing::warn!(error = %e, "signal watcher task failed");
        }
        if let Some(task) = uptime_task {
            let _ = task.await;
        }

        tracing::info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "logvault-daemon shut down"
        );
        result
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &LogvaultConfig {
        &self.config
    }
}

/// Cancel `shutdown` when SIGTERM or SIGINT arrives.
fn spawn_signal_watcher(shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            signal = wait_for_shutdown_signal() => {
                match signal {
                    Ok(name) => tracing::info!(signal = name, "shutdown signal received"),
                    Err(e) => tracing::error!(error = %e, "signal handling unavailable"),
                }
                shutdown.cancel();
            }
            _ = shutdown.cancelled() => {}
        }
    })
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Spawn a background task that periodically updates the uptime metric.
fn spawn_uptime_updater(
    start_time: Instant,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(UPTIME_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => record_uptime(start_time),
                _ = shutdown.cancelled() => {
                    tracing::debug!("uptime updater shutting down");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_from_default_config() {
        let orchestrator = Orchestrator::build_from_config(LogvaultConfig::default()).unwrap();
        assert_eq!(orchestrator.config().server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn build_rejects_invalid_config() {
        let mut config = LogvaultConfig::default();
        config.storage.backend = "tape".to_owned();
        let err = Orchestrator::build_from_config(config).err().unwrap();
        assert!(err.to_string().contains("config validation failed"));
    }

    #[test]
    fn build_rejects_excessive_timeout() {
        let mut config = LogvaultConfig::default();
        config.notification.timeout_ms = 3_600_000;
        assert!(Orchestrator::build_from_config(config).is_err());
    }

    #[tokio::test]
    async fn cancelled_token_stops_server() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LogvaultConfig::default();
        config.storage.root_dir = dir.path().display().to_string();

        let orchestrator = Orchestrator::build_from_config(config).unwrap();
        let token = orchestrator.shutdown_token();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let task = tokio::spawn(orchestrator.run_with_listener(listener));
        token.cancel();

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
