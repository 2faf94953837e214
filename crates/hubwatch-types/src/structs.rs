//! Core entity structs: monitored entries and their history samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EntryId, META_TITLE};

/// Current known state of one monitored server.
///
/// The `id` is always [`EntryId::from_title`] of `title`; construct entries
/// through [`Entry::new`] or [`Entry::meta`] to keep that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Title-derived identifier.
    pub id: EntryId,
    /// Listing title as reported by the source.
    pub title: String,
    /// Link to the server's website (may be empty).
    pub site_url: String,
    /// Link used to join the game (may be empty).
    pub game_url: String,
    /// Time of the last successful observation.
    pub last_seen: DateTime<Utc>,
    /// Player count at `last_seen`, or 0 once the entry has gone quiet.
    pub players: u32,
}

impl Entry {
    /// Create an entry observed at `last_seen`, deriving its ID from `title`.
    pub fn new(
        title: impl Into<String>,
        site_url: impl Into<String>,
        game_url: impl Into<String>,
        last_seen: DateTime<Utc>,
        players: u32,
    ) -> Self {
        let title = title.into();
        Self {
            id: EntryId::from_title(&title),
            title,
            site_url: site_url.into(),
            game_url: game_url.into(),
            last_seen,
            players,
        }
    }

    /// Create the synthetic meta entry for a cycle.
    pub fn meta(time: DateTime<Utc>, players: u32) -> Self {
        Self::new(META_TITLE, "", "", time, players)
    }

    /// Whether this is the synthetic meta entry.
    pub fn is_meta(&self) -> bool {
        self.id == EntryId::meta()
    }

    /// Copy of this entry with the player count cleared.
    ///
    /// Identity, URLs, and `last_seen` are kept: a zeroed entry still ages
    /// from its last real observation.
    #[must_use]
    pub fn zeroed(&self) -> Self {
        Self {
            players: 0,
            ..self.clone()
        }
    }
}

/// One timestamped player-count sample for one entry.
///
/// Append-only. Identity is `(entry_id, time)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// When the sample was taken.
    pub time: DateTime<Utc>,
    /// The entry this sample belongs to (reference only, no ownership).
    pub entry_id: EntryId,
    /// Player count at `time`.
    pub players: u32,
}
