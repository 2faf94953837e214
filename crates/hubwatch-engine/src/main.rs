//! Engine binary for hubwatch.
//!
//! This is the main entry point that wires together the poll loop, the
//! storage backend, and the observer API. It loads configuration,
//! initializes all subsystems, and runs until interrupted or until one of
//! its long-running tasks stops.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `hubwatch-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Connect the storage backend (and run migrations)
//! 4. Build the HTTP snapshot source
//! 5. Start the Observer API server
//! 6. Spawn the poll loop
//! 7. Wait for `Ctrl-C` or a task exit

mod error;

use std::path::Path;
use std::sync::Arc;

use hubwatch_core::config::HubwatchConfig;
use hubwatch_core::meta::MetaHandle;
use hubwatch_core::scheduler::{Scheduler, SchedulerConfig};
use hubwatch_db::StoreBackend;
use hubwatch_observer::{AppState, ServerConfig, spawn_observer};
use hubwatch_scraper::HttpSnapshotSource;
use tokio::sync::oneshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const CONFIG_PATH: &str = "hubwatch-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step fails or a long-running
/// task stops.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so note where it came
    //    from and report it once the subscriber exists.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("hubwatch-engine starting");
    info!(
        from_file,
        source_url = config.scraper.source_url,
        poll_interval_secs = config.scraper.poll_interval_secs,
        timeout_secs = config.scraper.timeout_secs,
        retention_hours = config.retention.hours,
        "Configuration loaded"
    );

    // 3. Connect the storage backend.
    let store = StoreBackend::connect(&config.storage).await?;
    info!(backend = store.kind(), "Storage backend ready");

    // 4. Build the snapshot source.
    let source = HttpSnapshotSource::new(&config.scraper)?;

    // 5. Start Observer API server.
    let meta = MetaHandle::new();
    let app_state = Arc::new(
        AppState::new(store.clone(), meta.clone())
            .with_request_timeout(config.observer.request_timeout()),
    );
    let (stop_observer, observer_stop) = oneshot::channel();
    let mut observer = spawn_observer(
        ServerConfig::from(config.observer.clone()),
        app_state,
        observer_stop,
    )
    .map_err(EngineError::from)?;

    // 6. Spawn the poll loop.
    let scheduler = Scheduler::new(source, store, SchedulerConfig::from(&config), meta);
    let mut poller = tokio::spawn(scheduler.run());
    info!("Poll loop started");

    // 7. Run until interrupted or a task stops.
    let result = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            poller.abort();
            // Let the observer drain in-flight requests before exiting.
            let _ = stop_observer.send(());
            match (&mut observer).await {
                Ok(served) => served.map_err(EngineError::from),
                Err(e) => Err(EngineError::ObserverExited {
                    message: format!("task failed: {e}"),
                }),
            }
        }
        joined = &mut observer => {
            poller.abort();
            match joined {
                Ok(Err(e)) => Err(EngineError::from(e)),
                Ok(Ok(())) => Err(EngineError::ObserverExited {
                    message: "server stopped".to_owned(),
                }),
                Err(e) => Err(EngineError::ObserverExited {
                    message: format!("task failed: {e}"),
                }),
            }
        }
        joined = &mut poller => {
            observer.abort();
            Err(EngineError::Scheduler {
                message: match joined {
                    Ok(()) => "returned".to_owned(),
                    Err(e) => format!("{e}"),
                },
            })
        }
    };

    info!("hubwatch-engine shutdown complete");
    Ok(result?)
}

/// Load configuration from `hubwatch-config.yaml`, falling back to defaults
/// (still subject to environment overrides) when the file is absent.
///
/// Returns the configuration and whether it was read from the file.
fn load_config() -> Result<(HubwatchConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((HubwatchConfig::from_file(config_path)?, true))
    } else {
        let mut config = HubwatchConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok((config, false))
    }
}
