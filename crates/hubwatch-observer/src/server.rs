//! Observer HTTP server lifecycle.
//!
//! [`start_server`] binds the listener and serves the router until the
//! supplied shutdown future resolves, then drains in-flight requests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use hubwatch_core::config::ObserverConfig;
use tokio::net::TcpListener;

use crate::router::build_router;
use crate::state::AppState;

/// Listener address for the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind, e.g. `0.0.0.0`.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl ServerConfig {
    /// Resolve host and port into a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Address`] if they do not form one.
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|e| ServerError::Address(format!("{raw}: {e}")))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ObserverConfig::default().into()
    }
}

impl From<ObserverConfig> for ServerConfig {
    fn from(config: ObserverConfig) -> Self {
        Self {
            host: config.host,
            port: config.port,
        }
    }
}

/// Serve the observer API until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`ServerError::Address`] for an unusable address,
/// [`ServerError::Bind`] if the port cannot be bound, or
/// [`ServerError::Serve`] on a fatal I/O error while serving.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("{addr}: {e}")))?;

    tracing::info!(%addr, "Observer server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    tracing::info!(%addr, "Observer server stopped");
    Ok(())
}

/// Errors that can occur when starting or running the observer server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Host and port do not form a socket address.
    #[error("invalid listen address {0}")]
    Address(String),

    /// The listener could not be bound.
    #[error("bind failed on {0}")]
    Bind(String),

    /// Serving stopped on an I/O error.
    #[error("serve error: {0}")]
    Serve(String),
}
