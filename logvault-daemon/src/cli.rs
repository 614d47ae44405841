//! CLI argument definitions for logvault-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use logvault_core::config::LogvaultConfig;

/// logvault log ingestion daemon.
///
/// Accepts log submissions over HTTP, persists them to the configured
/// bucket and publishes an alert for critical log types.
#[derive(Parser, Debug)]
#[command(name = "logvault-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to logvault.toml configuration file.
    ///
    /// When omitted, defaults plus environment variables are used.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Override the HTTP bind address (e.g. 0.0.0.0:8080).
    #[arg(long)]
    pub bind: Option<String>,

    /// Validate configuration and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,
}

impl DaemonCli {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut LogvaultConfig) {
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.general.log_format = format.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
    }
}
