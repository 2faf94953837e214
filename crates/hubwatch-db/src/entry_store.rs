//! Entry and history persistence on `PostgreSQL`.
//!
//! Entries live in the `entries` table, keyed by their title-derived ID and
//! upserted each cycle. History points are append-only in `history`, keyed
//! by `(entry_id, time)`; a repeated point is silently skipped, which keeps
//! a replayed cycle from doubling the timeline.

use chrono::{DateTime, Utc};
use hubwatch_core::store::{Store, StoreError};
use hubwatch_types::{Entry, EntryId, HistoryPoint};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

/// [`Store`] implementation over the `entries` and `history` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store bound to a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Round-trip a trivial query to check the database is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // =========================================================================
    // Entries
    // =========================================================================

    /// Load every row of the `entries` table.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails, or
    /// [`DbError::Corrupt`] if a row holds a negative player count.
    pub async fn load_all(&self) -> Result<Vec<Entry>, DbError> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r"SELECT id, title, site_url, game_url, last_seen, players
              FROM entries
              ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Entry::try_from).collect()
    }

    /// Upsert entries by ID inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any insert fails; nothing is
    /// committed in that case.
    pub async fn upsert(&self, entries: &[Entry]) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for entry in entries {
            sqlx::query(
                r"INSERT INTO entries (id, title, site_url, game_url, last_seen, players)
                  VALUES ($1, $2, $3, $4, $5, $6)
                  ON CONFLICT (id) DO UPDATE SET
                    title = EXCLUDED.title,
                    site_url = EXCLUDED.site_url,
                    game_url = EXCLUDED.game_url,
                    last_seen = EXCLUDED.last_seen,
                    players = EXCLUDED.players",
            )
            .bind(entry.id.into_inner())
            .bind(&entry.title)
            .bind(&entry.site_url)
            .bind(&entry.game_url)
            .bind(entry.last_seen)
            .bind(players_to_db(entry.players, entry.id.into_inner()))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(count = entries.len(), "Upserted entries");
        Ok(())
    }

    /// Delete entries by ID. History rows are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn remove(&self, entries: &[Entry]) -> Result<(), DbError> {
        let ids: Vec<Uuid> = entries.iter().map(|e| e.id.into_inner()).collect();

        let result = sqlx::query(r"DELETE FROM entries WHERE id = ANY($1)")
            .bind(&ids)
            .execute(&self.pool)
            .await?;

        tracing::debug!(deleted = result.rows_affected(), "Deleted entries");
        Ok(())
    }

    /// Fetch one entry by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails, or
    /// [`DbError::Corrupt`] if the row cannot be mapped.
    pub async fn get(&self, id: EntryId) -> Result<Option<Entry>, DbError> {
        let row = sqlx::query_as::<_, EntryRow>(
            r"SELECT id, title, site_url, game_url, last_seen, players
              FROM entries
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Entry::try_from).transpose()
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Append history points inside one transaction, skipping any
    /// `(entry_id, time)` pair that already exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any insert fails.
    pub async fn insert_history(&self, points: &[HistoryPoint]) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted: u64 = 0;

        for point in points {
            let result = sqlx::query(
                r"INSERT INTO history (entry_id, time, players)
                  VALUES ($1, $2, $3)
                  ON CONFLICT (entry_id, time) DO NOTHING",
            )
            .bind(point.entry_id.into_inner())
            .bind(point.time)
            .bind(players_to_db(point.players, point.entry_id.into_inner()))
            .execute(&mut *tx)
            .await?;
            inserted = inserted.saturating_add(result.rows_affected());
        }

        tx.commit().await?;
        tracing::debug!(
            offered = points.len(),
            inserted,
            "Appended history points"
        );
        Ok(())
    }

    /// History of one entry at or after `since`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails, or
    /// [`DbError::Corrupt`] if a row cannot be mapped.
    pub async fn history_since(
        &self,
        id: EntryId,
        since: DateTime<Utc>,
    ) -> Result<Vec<HistoryPoint>, DbError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r"SELECT entry_id, time, players
              FROM history
              WHERE entry_id = $1 AND time >= $2
              ORDER BY time ASC",
        )
        .bind(id.into_inner())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(HistoryPoint::try_from).collect()
    }
}

impl Store for PgStore {
    async fn load_entries(&self) -> Result<Vec<Entry>, StoreError> {
        Ok(self.load_all().await?)
    }

    async fn save_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }
        Ok(self.upsert(entries).await?)
    }

    async fn delete_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }
        Ok(self.remove(entries).await?)
    }

    async fn append_history(&self, points: &[HistoryPoint]) -> Result<(), StoreError> {
        if points.is_empty() {
            return Ok(());
        }
        Ok(self.insert_history(points).await?)
    }

    async fn entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        Ok(self.get(id).await?)
    }

    async fn history(
        &self,
        id: EntryId,
        since: DateTime<Utc>,
    ) -> Result<Vec<HistoryPoint>, StoreError> {
        Ok(self.history_since(id, since).await?)
    }
}

// =============================================================================
// Row types
// =============================================================================

/// Row returned from the `entries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntryRow {
    /// Entry ID.
    pub id: Uuid,
    /// Listing title.
    pub title: String,
    /// Link to the listing's website.
    pub site_url: String,
    /// Link to join the game.
    pub game_url: String,
    /// When the entry was last observed.
    pub last_seen: DateTime<Utc>,
    /// Player count as stored.
    pub players: i32,
}

impl TryFrom<EntryRow> for Entry {
    type Error = DbError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EntryId::from(row.id),
            players: players_from_db(row.players, row.id)?,
            title: row.title,
            site_url: row.site_url,
            game_url: row.game_url,
            last_seen: row.last_seen,
        })
    }
}

/// Row returned from the `history` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryRow {
    /// Entry the sample belongs to.
    pub entry_id: Uuid,
    /// Sample time.
    pub time: DateTime<Utc>,
    /// Player count as stored.
    pub players: i32,
}

impl TryFrom<HistoryRow> for HistoryPoint {
    type Error = DbError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            time: row.time,
            entry_id: EntryId::from(row.entry_id),
            players: players_from_db(row.players, row.entry_id)?,
        })
    }
}

/// Player counts are stored as `INTEGER`; anything above `i32::MAX` is
/// clamped, with a warning since the stored value then differs.
fn players_to_db(players: u32, id: Uuid) -> i32 {
    i32::try_from(players).unwrap_or_else(|_| {
        tracing::warn!(%id, players, stored = i32::MAX, "Player count clamped to fit INTEGER column");
        i32::MAX
    })
}

fn players_from_db(players: i32, id: Uuid) -> Result<u32, DbError> {
    u32::try_from(players)
        .map_err(|_| DbError::Corrupt(format!("negative player count {players} for {id}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::TimeZone;

    use super::*;

    fn row(players: i32) -> EntryRow {
        let id = EntryId::from_title("Harbor Town");
        EntryRow {
            id: id.into_inner(),
            title: "Harbor Town".to_owned(),
            site_url: "https://harbor.example".to_owned(),
            game_url: "https://harbor.example/play".to_owned(),
            last_seen: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            players,
        }
    }

    #[test]
    fn entry_row_maps_to_entry() {
        let entry = Entry::try_from(row(42)).unwrap();
        assert_eq!(entry.id, EntryId::from_title("Harbor Town"));
        assert_eq!(entry.players, 42);
        assert_eq!(entry.game_url, "https://harbor.example/play");
    }

    #[test]
    fn negative_players_are_corrupt() {
        let err = Entry::try_from(row(-1)).unwrap_err();
        assert!(matches!(err, DbError::Corrupt(_)));
        assert!(matches!(StoreError::from(err), StoreError::Corrupt { .. }));
    }

    #[test]
    fn history_row_maps_to_point() {
        let time = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let point = HistoryPoint::try_from(HistoryRow {
            entry_id: EntryId::meta().into_inner(),
            time,
            players: 7,
        })
        .unwrap();
        assert_eq!(point.entry_id, EntryId::meta());
        assert_eq!(point.time, time);
        assert_eq!(point.players, 7);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn oversized_player_counts_clamp_with_warning() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let id = EntryId::from_title("Bay").into_inner();

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(players_to_db(12, id), 12);
            assert!(captured.0.lock().unwrap().is_empty());
            assert_eq!(players_to_db(u32::MAX, id), i32::MAX);
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Player count clamped"));
        assert!(logs.contains(&id.to_string()));
    }
}
