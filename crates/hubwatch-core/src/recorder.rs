//! History point emission.
//!
//! One point per entry per cycle, stamped with the cycle's `now` regardless
//! of the entry's own `last_seen`. Zeroed entries therefore get a 0-player
//! point at `now` while their record keeps the last real observation time.

use chrono::{DateTime, Utc};
use hubwatch_types::{Entry, HistoryPoint};

use crate::store::{Store, StoreError};

/// Convert entries into history points at `now`.
pub fn history_points(now: DateTime<Utc>, entries: &[Entry]) -> Vec<HistoryPoint> {
    entries
        .iter()
        .map(|entry| HistoryPoint {
            time: now,
            entry_id: entry.id,
            players: entry.players,
        })
        .collect()
}

/// Append one history point per entry to the store.
///
/// Returns the number of points handed to the store. An empty entry list
/// issues no store call.
///
/// # Errors
///
/// Returns the store's [`StoreError`] if the batch is rejected. No partial
/// rollback is attempted beyond what the store itself guarantees.
pub async fn record<S: Store>(
    store: &S,
    now: DateTime<Utc>,
    entries: &[Entry],
) -> Result<usize, StoreError> {
    if entries.is_empty() {
        return Ok(0);
    }
    let points = history_points(now, entries);
    store.append_history(&points).await?;
    tracing::debug!(count = points.len(), %now, "Appended history points");
    Ok(points.len())
}
