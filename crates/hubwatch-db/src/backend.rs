//! Runtime selection between the `PostgreSQL` and in-memory stores.

use chrono::{DateTime, Utc};
use hubwatch_core::config::{StorageBackendKind, StorageConfig};
use hubwatch_core::memory::MemoryStore;
use hubwatch_core::store::{Store, StoreError};
use hubwatch_types::{Entry, EntryId, HistoryPoint};

use crate::entry_store::PgStore;
use crate::error::DbError;
use crate::postgres::{PostgresConfig, PostgresPool};

/// A [`Store`] chosen at startup from [`StorageConfig`].
///
/// Cheap to clone: both variants share their underlying state, so the
/// scheduler and the observer can each hold a copy.
#[derive(Clone)]
pub enum StoreBackend {
    /// Durable storage in `PostgreSQL`.
    Postgres(PgStore),
    /// Process-local storage; lost on restart.
    Memory(MemoryStore),
}

impl StoreBackend {
    /// Build the configured backend. For `PostgreSQL` this connects and
    /// runs pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    pub async fn connect(config: &StorageConfig) -> Result<Self, DbError> {
        match config.backend {
            StorageBackendKind::Memory => {
                tracing::warn!("Using in-memory storage; history will not survive a restart");
                Ok(Self::Memory(MemoryStore::new()))
            }
            StorageBackendKind::Postgres => {
                let pool = PostgresPool::connect(&PostgresConfig::from(config)).await?;
                pool.run_migrations().await?;
                Ok(Self::Postgres(PgStore::new(pool.into_inner())))
            }
        }
    }

    /// Check that the backend can answer queries.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if `PostgreSQL` is unreachable. The memory
    /// backend always succeeds.
    pub async fn ping(&self) -> Result<(), DbError> {
        match self {
            Self::Postgres(s) => s.ping().await,
            Self::Memory(_) => Ok(()),
        }
    }

    /// Short name of the active backend, for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl From<MemoryStore> for StoreBackend {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<PgStore> for StoreBackend {
    fn from(store: PgStore) -> Self {
        Self::Postgres(store)
    }
}

impl Store for StoreBackend {
    async fn load_entries(&self) -> Result<Vec<Entry>, StoreError> {
        match self {
            Self::Postgres(s) => s.load_entries().await,
            Self::Memory(s) => s.load_entries().await,
        }
    }

    async fn save_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        match self {
            Self::Postgres(s) => s.save_entries(entries).await,
            Self::Memory(s) => s.save_entries(entries).await,
        }
    }

    async fn delete_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        match self {
            Self::Postgres(s) => s.delete_entries(entries).await,
            Self::Memory(s) => s.delete_entries(entries).await,
        }
    }

    async fn append_history(&self, points: &[HistoryPoint]) -> Result<(), StoreError> {
        match self {
            Self::Postgres(s) => s.append_history(points).await,
            Self::Memory(s) => s.append_history(points).await,
        }
    }

    async fn entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        match self {
            Self::Postgres(s) => s.entry(id).await,
            Self::Memory(s) => s.entry(id).await,
        }
    }

    async fn history(
        &self,
        id: EntryId,
        since: DateTime<Utc>,
    ) -> Result<Vec<HistoryPoint>, StoreError> {
        match self {
            Self::Postgres(s) => s.history(id, since).await,
            Self::Memory(s) => s.history(id, since).await,
        }
    }
}
