//! Shared application state for the Observer API server.

use std::time::Duration;

use chrono::{DateTime, Utc};
use hubwatch_core::config::ObserverConfig;
use hubwatch_core::meta::MetaHandle;
use hubwatch_db::StoreBackend;

/// State shared by every request handler.
///
/// Both handles point at state owned elsewhere: the store is the one the
/// poll cycle writes to, and the meta handle is the one it publishes into
/// after each successful cycle.
#[derive(Clone)]
pub struct AppState {
    /// Read access to stored entries and history.
    pub store: StoreBackend,
    /// Latest published meta entry.
    pub meta: MetaHandle,
    /// When this observer instance started.
    pub started_at: DateTime<Utc>,
    /// Bound on a single request, applied by the router.
    pub request_timeout: Duration,
}

impl AppState {
    /// Create state over an existing store and meta handle, with the
    /// default request timeout.
    pub fn new(store: StoreBackend, meta: MetaHandle) -> Self {
        Self {
            store,
            meta,
            started_at: Utc::now(),
            request_timeout: ObserverConfig::default().request_timeout(),
        }
    }

    /// Replace the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
