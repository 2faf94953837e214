//! Storage backends for hubwatch.
//!
//! `PostgreSQL` is the durable store for entries and their append-only
//! history. The in-memory store from `hubwatch-core` is offered alongside it
//! for development runs, and [`StoreBackend`] picks between the two at
//! startup.
//!
//! # Architecture
//!
//! ```text
//! Poll cycle (writes)         Observer API (reads)
//!     |                             |
//!     +--------> StoreBackend <-----+
//!                 |         |
//!          PgStore (sqlx)   MemoryStore
//!           |-- entries  (upsert / delete)
//!           +-- history  (append-only, keyed by entry_id + time)
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool, configuration, migrations
//! - [`entry_store`] -- [`PgStore`], the `PostgreSQL` [`Store`] implementation
//! - [`backend`] -- [`StoreBackend`] enum dispatch over the available stores
//! - [`error`] -- Shared error types
//!
//! [`Store`]: hubwatch_core::store::Store

pub mod backend;
pub mod entry_store;
pub mod error;
pub mod postgres;

// Re-export primary types for convenience.
pub use backend::StoreBackend;
pub use entry_store::{EntryRow, HistoryRow, PgStore};
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
