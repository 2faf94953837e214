//! Shared type definitions for the hubwatch server monitor.
//!
//! This crate is the single source of truth for the data model shared by
//! the reconciliation core, the storage backends, the snapshot source, and
//! the observer API.
//!
//! # Modules
//!
//! - [`ids`] -- Title-derived [`EntryId`] and the meta sentinel identity
//! - [`structs`] -- [`Entry`] and [`HistoryPoint`]

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{EntryId, META_TITLE};
pub use structs::{Entry, HistoryPoint};
