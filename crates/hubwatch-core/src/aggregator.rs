//! Meta entry computation.
//!
//! The meta entry summarises the whole population for one cycle: its player
//! count is the sum over every real entry in the snapshot. It is recomputed
//! from scratch each cycle and never loaded from storage.

use chrono::{DateTime, Utc};
use hubwatch_types::Entry;

/// Total players across the real entries of a snapshot.
///
/// Entries that are themselves the meta entry are skipped. The sum
/// saturates at `u32::MAX`.
pub fn total_players(snapshot: &[Entry]) -> u32 {
    snapshot
        .iter()
        .filter(|entry| !entry.is_meta())
        .fold(0_u32, |acc, entry| acc.saturating_add(entry.players))
}

/// Build the meta entry for a snapshot taken at `now`.
pub fn meta_entry(now: DateTime<Utc>, snapshot: &[Entry]) -> Entry {
    Entry::meta(now, total_players(snapshot))
}
