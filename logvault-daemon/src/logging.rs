//! Logging initialization for logvault-daemon.
//!
//! Configures `tracing-subscriber` from the `[general]` section of
//! `LogvaultConfig`. With the `log` notifier this subscriber is the alert
//! channel itself: `logvault::alert` events are always kept at `warn`,
//! whatever `log_level` or `RUST_LOG` says about everything else.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use logvault_core::config::GeneralConfig;

/// Target of the events written by the `log` notifier.
pub const ALERT_TARGET: &str = "logvault::alert";

/// Build the event filter for `level`.
///
/// `RUST_LOG` takes precedence over `level` when it is set and valid.
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow::anyhow!("invalid log level '{}': {}", level, e))?,
    };
    Ok(filter.add_directive(format!("{ALERT_TARGET}=warn").parse()?))
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines (default for production)
/// * `"pretty"` - Human-readable output (for development)
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.log_format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        "pretty" => fmt::layer().pretty().boxed(),
        other => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                other
            ));
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_filter(&config.log_level)?)
        .try_init()
        .map_err(|e| {
            anyhow::anyhow!(
                "failed to initialize {} tracing subscriber: {}",
                config.log_format,
                e
            )
        })
}
