use retro_worker::logger;

use retro_config::Config;
use retro_sync::{PlaintextCipher, ProviderRegistry, ShutdownCoordinator, SyncEngine};

use std::error::Error;
use std::sync::Arc;

use log::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    config.validate()?;

    let log_file = logger::log_file_path(&config)?;
    logger::initialize(config.logging.level, log_file, config.logging.colored)?;

    info!("Starting retro-worker v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let database_path = config.database_path()?;
    let pool = retro_db::connect(&database_path, config.database.max_connections).await?;

    // Tracker adapters are linked in by the deployment; this binary ships none.
    let registry = ProviderRegistry::new();
    warn!("No task or time tracker adapters registered; sync jobs will fail until one is");

    let engine = SyncEngine::new(
        pool.clone(),
        registry,
        Arc::new(PlaintextCipher),
        &config.sync,
        config.retry.clone(),
    );
    engine.queue().recover_abandoned().await?;

    let shutdown = ShutdownCoordinator::new();
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    engine.worker(config.worker.clone()).run(&shutdown).await;

    pool.close().await;
    info!("retro-worker stopped");

    Ok(())
}
