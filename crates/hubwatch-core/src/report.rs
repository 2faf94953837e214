//! Per-cycle outcome reporting.
//!
//! Failures inside a cycle never propagate out of it. They are logged where
//! they happen and collected here so callers and tests can see what a cycle
//! did without scraping logs.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persistence step within one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CycleStep {
    /// Saving the snapshot plus meta entry.
    SaveSnapshot,
    /// Appending history for the snapshot plus meta entry.
    AppendSnapshotHistory,
    /// Loading prior state for reconciliation.
    LoadStored,
    /// Deleting entries past the retention window.
    DeleteEvicted,
    /// Saving entries whose player count was zeroed.
    SaveZeroed,
    /// Appending zero-valued history for zeroed entries.
    AppendZeroedHistory,
}

/// A step that failed, with the error rendered for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    /// Which step failed.
    pub step: CycleStep,
    /// The error message.
    pub message: String,
}

/// What a completed reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Number of entries deleted.
    pub evicted: usize,
    /// Number of entries zeroed (and given a zero history point).
    pub zeroed: usize,
    /// Steps that failed.
    pub failures: Vec<StepFailure>,
}

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CycleOutcome {
    /// The snapshot could not be acquired; nothing was written.
    AcquireFailed {
        /// The acquisition error.
        message: String,
    },
    /// The snapshot was acquired and every step was attempted.
    Completed {
        /// Number of real entries in the snapshot.
        observed: usize,
        /// Player count of the meta entry.
        meta_players: u32,
        /// Number of entries evicted.
        evicted: usize,
        /// Number of entries zeroed.
        zeroed: usize,
        /// Steps that failed during the cycle.
        failures: Vec<StepFailure>,
    },
}

/// Summary of one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Reference time of the cycle.
    pub now: DateTime<Utc>,
    /// How the cycle ended.
    pub outcome: CycleOutcome,
}

impl CycleReport {
    /// Whether the cycle acquired a snapshot and every write succeeded.
    pub fn is_clean(&self) -> bool {
        matches!(&self.outcome, CycleOutcome::Completed { failures, .. } if failures.is_empty())
    }
}
