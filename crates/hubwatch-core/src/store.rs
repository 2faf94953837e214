//! Persistent store contract consumed by the reconciliation cycle.
//!
//! The cycle only needs the four write-path operations; the two read-side
//! queries serve the observer API. Implementations must be safe to call
//! concurrently: the observer reads while the cycle writes.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so the
//! scheduler can be spawned onto a multi-threaded runtime.

use std::future::Future;

use chrono::{DateTime, Utc};
use hubwatch_types::{Entry, EntryId, HistoryPoint};

/// Errors surfaced by a store backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("store backend error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },

    /// Stored data could not be mapped back into domain types.
    #[error("corrupt stored data: {message}")]
    Corrupt {
        /// What was wrong with the stored data.
        message: String,
    },
}

impl StoreError {
    /// Shorthand for a [`StoreError::Backend`] error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Key-value/list store for entries and their append-only history.
pub trait Store: Send + Sync {
    /// Load every stored entry (the full prior state).
    fn load_entries(&self) -> impl Future<Output = Result<Vec<Entry>, StoreError>> + Send;

    /// Insert or replace entries by ID.
    fn save_entries(&self, entries: &[Entry])
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove entries by ID. History points are kept.
    fn delete_entries(
        &self,
        entries: &[Entry],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Append history points. A point whose `(entry_id, time)` already
    /// exists is ignored.
    fn append_history(
        &self,
        points: &[HistoryPoint],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Fetch one entry by ID.
    fn entry(
        &self,
        id: EntryId,
    ) -> impl Future<Output = Result<Option<Entry>, StoreError>> + Send;

    /// History of one entry at or after `since`, oldest first.
    fn history(
        &self,
        id: EntryId,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<HistoryPoint>, StoreError>> + Send;
}
