use anyhow::Result;
use clap::Parser;

use logvault_core::config::LogvaultConfig;
use logvault_daemon::cli::DaemonCli;
use logvault_daemon::logging;
use logvault_daemon::orchestrator::Orchestrator;
use logvault_ingest::IngestConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    // 설정 로드: 파일(있으면) -> 환경변수 -> CLI
    let mut config = match &cli.config {
        Some(path) => LogvaultConfig::load(path).await,
        None => LogvaultConfig::from_env(),
    }
    .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
    cli.apply_overrides(&mut config);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;
    IngestConfig::from_core(&config)
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

    if cli.validate {
        println!("configuration is valid");
        return Ok(());
    }

    logging::init_tracing(&config.general)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logvault-daemon starting");

    let orchestrator = Orchestrator::build_from_config(config)?;
    orchestrator.run().await
}
