//! Alive/zero/evict classification of stored entries.
//!
//! After the fresh snapshot has been saved, every stored entry falls into
//! exactly one class, decided by its age relative to the cycle's `now`:
//!
//! | Condition | Class | Effect |
//! |-----------|-------|--------|
//! | `now - last_seen > retention` | [`Classification::Evict`] | record deleted, history kept |
//! | `last_seen != now` | [`Classification::Zero`] | players set to 0, zero point at `now` |
//! | otherwise | [`Classification::Alive`] | untouched (already saved fresh) |
//!
//! The age check runs first, so an entry is never both zeroed and evicted.
//! A zeroed entry keeps `last_seen` at its last real observation so it keeps
//! ageing towards eviction; only its history point carries `now`.
//!
//! `now` and `retention` are always parameters. Nothing in this module
//! reads the wall clock.

use chrono::{DateTime, TimeDelta, Utc};
use hubwatch_types::Entry;

use crate::recorder;
use crate::report::{ApplyReport, CycleStep, StepFailure};
use crate::store::{Store, StoreError};

/// Default retention window in hours.
pub const DEFAULT_RETENTION_HOURS: u32 = 72;

/// The class a stored entry falls into for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Refreshed by the current snapshot.
    Alive,
    /// Unobserved this cycle but inside the retention window.
    Zero,
    /// Unobserved for longer than the retention window.
    Evict,
}

/// The write-set produced by one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Entries to delete.
    pub evict: Vec<Entry>,
    /// Entries to save, already carrying a player count of 0.
    pub zero: Vec<Entry>,
}

impl Reconciliation {
    /// Whether the pass requires no writes.
    pub fn is_empty(&self) -> bool {
        self.evict.is_empty() && self.zero.is_empty()
    }
}

/// Classify one stored entry.
pub fn classify_entry(now: DateTime<Utc>, retention: TimeDelta, entry: &Entry) -> Classification {
    let delta = now.signed_duration_since(entry.last_seen);
    if delta > retention {
        Classification::Evict
    } else if entry.last_seen != now {
        Classification::Zero
    } else {
        Classification::Alive
    }
}

/// Split stored entries into the eviction and zeroing write-sets.
pub fn classify(now: DateTime<Utc>, retention: TimeDelta, stored: Vec<Entry>) -> Reconciliation {
    let mut result = Reconciliation::default();
    for entry in stored {
        match classify_entry(now, retention, &entry) {
            Classification::Evict => result.evict.push(entry),
            Classification::Zero => {
                result.zero.push(Entry {
                    players: 0,
                    ..entry
                });
            }
            Classification::Alive => {}
        }
    }
    result
}

/// Load the full prior state and classify it.
///
/// # Errors
///
/// Returns the store's [`StoreError`] if the entries cannot be loaded.
pub async fn reconcile<S: Store>(
    store: &S,
    now: DateTime<Utc>,
    retention: TimeDelta,
) -> Result<Reconciliation, StoreError> {
    let stored = store.load_entries().await?;
    let loaded = stored.len();
    let reconciliation = classify(now, retention, stored);
    tracing::debug!(
        loaded,
        evict = reconciliation.evict.len(),
        zero = reconciliation.zero.len(),
        "Classified stored entries"
    );
    Ok(reconciliation)
}

/// Persist a reconciliation pass.
///
/// Eviction and zeroing are independent: a failed delete does not stop the
/// zeroed entries from being saved. The zero-valued history points are only
/// appended once the zeroed records themselves were saved.
pub async fn apply<S: Store>(
    store: &S,
    now: DateTime<Utc>,
    reconciliation: &Reconciliation,
) -> ApplyReport {
    let mut report = ApplyReport::default();
    if reconciliation.is_empty() {
        tracing::debug!("Every stored entry is fresh, nothing to reconcile");
        return report;
    }

    if !reconciliation.evict.is_empty() {
        match store.delete_entries(&reconciliation.evict).await {
            Ok(()) => {
                report.evicted = reconciliation.evict.len();
                for entry in &reconciliation.evict {
                    tracing::info!(
                        id = %entry.id,
                        title = entry.title.as_str(),
                        last_seen = %entry.last_seen,
                        "Evicted stale entry"
                    );
                }
            }
            Err(e) => {
                tracing::error!(error = %e, count = reconciliation.evict.len(), "Error removing old entries");
                report.failures.push(StepFailure {
                    step: CycleStep::DeleteEvicted,
                    message: e.to_string(),
                });
            }
        }
    }

    if !reconciliation.zero.is_empty() {
        match store.save_entries(&reconciliation.zero).await {
            Ok(()) => match recorder::record(store, now, &reconciliation.zero).await {
                Ok(_) => report.zeroed = reconciliation.zero.len(),
                Err(e) => {
                    tracing::error!(error = %e, "Error saving zeroed entry history");
                    report.failures.push(StepFailure {
                        step: CycleStep::AppendZeroedHistory,
                        message: e.to_string(),
                    });
                }
            },
            Err(e) => {
                tracing::error!(error = %e, count = reconciliation.zero.len(), "Error saving zeroed entries");
                report.failures.push(StepFailure {
                    step: CycleStep::SaveZeroed,
                    message: e.to_string(),
                });
            }
        }
    }

    report
}
