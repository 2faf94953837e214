//! Published latest meta entry.
//!
//! The scheduler computes a fresh meta entry every cycle and publishes it
//! here; request handlers read it synchronously. Publication goes through a
//! [`watch`] channel, so readers always see a whole entry from one cycle.

use std::sync::Arc;

use hubwatch_types::Entry;
use tokio::sync::watch;

/// Cloneable handle to the most recently computed meta entry.
#[derive(Debug, Clone)]
pub struct MetaHandle {
    tx: Arc<watch::Sender<Option<Entry>>>,
}

impl MetaHandle {
    /// Create a handle with nothing published yet.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the published meta entry.
    pub fn publish(&self, meta: Entry) {
        self.tx.send_replace(Some(meta));
    }

    /// The latest published meta entry, if any cycle has completed one.
    pub fn latest(&self) -> Option<Entry> {
        self.tx.borrow().clone()
    }

    /// Subscribe to future publications.
    pub fn subscribe(&self) -> watch::Receiver<Option<Entry>> {
        self.tx.subscribe()
    }
}

impl Default for MetaHandle {
    fn default() -> Self {
        Self::new()
    }
}
