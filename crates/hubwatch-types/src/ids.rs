//! Title-derived identifiers for monitored server entries.
//!
//! An entry's identity is a pure function of its title: the ID is a UUID v5
//! (SHA-1, name-based) of the title bytes inside a fixed hubwatch namespace.
//! The same title therefore yields the same ID across runs, processes, and
//! hosts, and the ID is safe to expose in external routes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title of the synthetic meta entry that aggregates the whole population.
///
/// The leading underscore keeps it out of the title space used by real
/// listings; snapshot sources drop any listing that carries it.
pub const META_TITLE: &str = "_hubwatch";

/// Namespace UUID under which entry titles are hashed.
const ENTRY_NAMESPACE: Uuid = Uuid::from_u128(0x6b1c_2f0e_9a4d_5e37_8c21_d4f0_3a9b_7e15);

/// Stable identifier of a monitored server entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

impl EntryId {
    /// Derive the identifier for a title.
    pub fn from_title(title: &str) -> Self {
        Self(Uuid::new_v5(&ENTRY_NAMESPACE, title.as_bytes()))
    }

    /// Identifier of the synthetic meta entry.
    pub fn meta() -> Self {
        Self::from_title(META_TITLE)
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl core::fmt::Display for EntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EntryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<EntryId> for Uuid {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn same_title_same_id() {
        let a = EntryId::from_title("Paradise Station");
        let b = EntryId::from_title("Paradise Station");
        assert_eq!(a, b);
    }

    #[test]
    fn id_is_stable_across_processes() {
        // Pinned values: a change here breaks every stored ID and external link.
        let id = EntryId::from_title("Paradise Station");
        assert_eq!(id.to_string(), "cc732795-4920-55a8-a1af-e128b84b4ac1");
        assert_eq!(id.into_inner().get_version_num(), 5);
        assert_eq!(
            EntryId::meta().to_string(),
            "1922191c-e742-579a-84a7-eb8ef44ac276"
        );
    }

    #[test]
    fn distinct_titles_do_not_collide() {
        let ids: BTreeSet<EntryId> = (0..1000)
            .map(|n| EntryId::from_title(&format!("Server #{n}")))
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn titles_are_case_and_whitespace_sensitive() {
        assert_ne!(EntryId::from_title("Bay"), EntryId::from_title("bay"));
        assert_ne!(EntryId::from_title("Bay"), EntryId::from_title("Bay "));
    }

    #[test]
    fn meta_id_matches_sentinel_title() {
        assert_eq!(EntryId::meta(), EntryId::from_title(META_TITLE));
        assert_ne!(EntryId::meta(), EntryId::from_title("hubwatch"));
    }

    #[test]
    fn id_serializes_as_plain_uuid() {
        let id = EntryId::from_title("Goon");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json, Some(format!("\"{}\"", id.into_inner())));
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = EntryId::from_title("Goon");
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
