//! Snapshot source trait and stub implementation.
//!
//! At the start of every cycle the scheduler asks a [`SnapshotSource`] for
//! the entries that are live right now. The trait abstracts where that list
//! comes from: an HTTP listing, a fixture file, or a test stub.

use std::future::Future;

use chrono::{DateTime, Utc};
use hubwatch_types::Entry;

/// Errors that can occur while acquiring a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The source could not be reached.
    #[error("snapshot source unreachable: {message}")]
    Unreachable {
        /// Description of the transport failure.
        message: String,
    },

    /// The source answered with something that is not a listing.
    #[error("malformed snapshot: {message}")]
    Malformed {
        /// Description of the parse failure.
        message: String,
    },

    /// The source did not answer within the configured deadline.
    #[error("snapshot acquisition timed out after {timeout_ms}ms")]
    Timeout {
        /// The deadline in milliseconds.
        timeout_ms: u64,
    },
}

/// A source of live entries.
pub trait SnapshotSource: Send + Sync {
    /// Return the entries live as of `now`.
    ///
    /// Every returned entry must carry `last_seen == now`; the reconciler
    /// relies on that to tell refreshed entries from stale ones.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the listing cannot be fetched or parsed.
    fn acquire(
        &self,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Entry>, SourceError>> + Send;
}

/// A stub source that reports a fixed set of listings.
///
/// Each call restamps the listings with the requested `now`. Useful for
/// running the engine without network access.
#[derive(Debug, Clone, Default)]
pub struct StubSnapshotSource {
    listings: Vec<Entry>,
}

impl StubSnapshotSource {
    /// Create a stub source reporting `listings` on every call.
    pub const fn new(listings: Vec<Entry>) -> Self {
        Self { listings }
    }
}

impl SnapshotSource for StubSnapshotSource {
    async fn acquire(&self, now: DateTime<Utc>) -> Result<Vec<Entry>, SourceError> {
        Ok(self
            .listings
            .iter()
            .map(|entry| Entry {
                last_seen: now,
                ..entry.clone()
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[tokio::test]
    async fn stub_restamps_listings() {
        let old = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let source = StubSnapshotSource::new(vec![Entry::new("Bay", "", "", old, 4)]);

        let snapshot = source.acquire(now).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].last_seen, now);
        assert_eq!(snapshot[0].players, 4);
    }
}
