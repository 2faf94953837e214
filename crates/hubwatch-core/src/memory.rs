//! In-process [`Store`] backed by ordered maps.
//!
//! Used by the engine's `memory` storage backend and by tests. Entries are
//! keyed by ID; history is keyed by `(entry_id, time)` so repeated appends
//! of the same sample collapse into one.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use hubwatch_types::{Entry, EntryId, HistoryPoint};
use tokio::sync::RwLock;

use crate::store::{Store, StoreError};

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<EntryId, Entry>,
    history: BTreeMap<(EntryId, DateTime<Utc>), u32>,
}

/// Shared in-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored history point, ordered by entry then time.
    pub async fn all_history(&self) -> Vec<HistoryPoint> {
        let inner = self.inner.read().await;
        inner
            .history
            .iter()
            .map(|(&(entry_id, time), &players)| HistoryPoint {
                time,
                entry_id,
                players,
            })
            .collect()
    }
}

impl Store for MemoryStore {
    async fn load_entries(&self) -> Result<Vec<Entry>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.entries.values().cloned().collect())
    }

    async fn save_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        for entry in entries {
            inner.entries.insert(entry.id, entry.clone());
        }
        Ok(())
    }

    async fn delete_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        for entry in entries {
            inner.entries.remove(&entry.id);
        }
        Ok(())
    }

    async fn append_history(&self, points: &[HistoryPoint]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        for point in points {
            inner
                .history
                .entry((point.entry_id, point.time))
                .or_insert(point.players);
        }
        Ok(())
    }

    async fn entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.entries.get(&id).cloned())
    }

    async fn history(
        &self,
        id: EntryId,
        since: DateTime<Utc>,
    ) -> Result<Vec<HistoryPoint>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .history
            .range((id, since)..)
            .take_while(|((entry_id, _), _)| *entry_id == id)
            .map(|(&(entry_id, time), &players)| HistoryPoint {
                time,
                entry_id,
                players,
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn save_replaces_by_id() {
        let store = MemoryStore::new();
        store
            .save_entries(&[Entry::new("Bay", "", "", t0(), 3)])
            .await
            .unwrap();
        store
            .save_entries(&[Entry::new("Bay", "", "", t0(), 8)])
            .await
            .unwrap();

        let entries = store.load_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].players, 8);
    }

    #[tokio::test]
    async fn delete_removes_entry_but_keeps_history() {
        let store = MemoryStore::new();
        let entry = Entry::new("Bay", "", "", t0(), 3);
        store.save_entries(&[entry.clone()]).await.unwrap();
        store
            .append_history(&[HistoryPoint {
                time: t0(),
                entry_id: entry.id,
                players: 3,
            }])
            .await
            .unwrap();

        store.delete_entries(&[entry.clone()]).await.unwrap();

        assert!(store.entry(entry.id).await.unwrap().is_none());
        assert_eq!(store.history(entry.id, t0()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_history_point_is_ignored() {
        let store = MemoryStore::new();
        let id = EntryId::from_title("Bay");
        let point = HistoryPoint {
            time: t0(),
            entry_id: id,
            players: 5,
        };
        store.append_history(&[point]).await.unwrap();
        store
            .append_history(&[HistoryPoint { players: 0, ..point }])
            .await
            .unwrap();

        let history = store.all_history().await;
        assert_eq!(history, vec![point]);
    }

    #[tokio::test]
    async fn history_filters_by_entry_and_since() {
        let store = MemoryStore::new();
        let bay = EntryId::from_title("Bay");
        let goon = EntryId::from_title("Goon");
        let points: Vec<HistoryPoint> = (0..4)
            .flat_map(|h| {
                let time = t0() + TimeDelta::hours(h);
                [
                    HistoryPoint { time, entry_id: bay, players: 1 },
                    HistoryPoint { time, entry_id: goon, players: 2 },
                ]
            })
            .collect();
        store.append_history(&points).await.unwrap();

        let history = store.history(bay, t0() + TimeDelta::hours(2)).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|p| p.entry_id == bay));
        assert!(history.windows(2).all(|w| w[0].time < w[1].time));
    }
}
