//! Wire format of the server listing and its normalisation into entries.
//!
//! The listing is a JSON array of objects. Only `title` is required; the
//! URLs default to empty and the player count to zero.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hubwatch_types::{Entry, META_TITLE};
use serde::Deserialize;

/// One server as reported by the listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Listing {
    /// Server title. Becomes the entry's identity.
    pub title: String,
    /// Link to the server's website.
    #[serde(default)]
    pub site_url: String,
    /// Link used to join the game.
    #[serde(default)]
    pub game_url: String,
    /// Players currently online.
    #[serde(default)]
    pub players: u32,
}

/// Decode a listing body.
///
/// # Errors
///
/// Returns the [`serde_json::Error`] if the body is not an array of
/// listings.
pub fn parse(body: &[u8]) -> Result<Vec<Listing>, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Turn raw listings into the entries observed at `now`.
///
/// Titles are trimmed. Listings with an empty title or the meta sentinel
/// are dropped. When a title appears more than once the listing with the
/// most players wins. Output is ordered by title.
pub fn normalise(now: DateTime<Utc>, listings: Vec<Listing>) -> Vec<Entry> {
    let mut by_title: BTreeMap<String, Listing> = BTreeMap::new();

    for mut listing in listings {
        let title = listing.title.trim();
        if title.is_empty() || title == META_TITLE {
            tracing::debug!(title = %listing.title, "Dropping listing with reserved or empty title");
            continue;
        }
        listing.title = title.to_owned();

        match by_title.get(&listing.title) {
            Some(existing) if existing.players >= listing.players => {}
            _ => {
                by_title.insert(listing.title.clone(), listing);
            }
        }
    }

    by_title
        .into_values()
        .map(|l| Entry::new(l.title, l.site_url, l.game_url, now, l.players))
        .collect()
}
