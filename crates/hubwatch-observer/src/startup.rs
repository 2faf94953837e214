//! Background startup of the observer alongside the poll loop.
//!
//! ```rust,ignore
//! let (stop, stopped) = tokio::sync::oneshot::channel();
//! let handle = spawn_observer(ServerConfig::default(), state, stopped)?;
//! // ...
//! let _ = stop.send(());
//! handle.await??;
//! ```

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError, start_server};
use crate::state::AppState;

/// Spawn the observer on its own task.
///
/// The server drains and exits once `stop` fires or its sender is dropped.
/// A bind failure surfaces through the returned handle.
///
/// # Errors
///
/// Returns [`ServerError::Address`] before spawning if the configured
/// address is unusable.
pub fn spawn_observer(
    config: ServerConfig,
    state: Arc<AppState>,
    stop: oneshot::Receiver<()>,
) -> Result<JoinHandle<Result<(), ServerError>>, ServerError> {
    let addr = config.addr()?;

    let handle = tokio::spawn(async move {
        let shutdown = async move {
            // A dropped sender means the engine is gone; stop either way.
            let _ = stop.await;
        };
        let result = start_server(&config, state, shutdown).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Observer server exited with error");
        }
        result
    });

    tracing::debug!(%addr, "Observer task spawned");
    Ok(handle)
}
