//! Reconciliation engine and poll cycle for the hubwatch server monitor.
//!
//! This crate owns the cycle that turns a noisy stream of server listings
//! into a consistent history: acquire a snapshot, add the meta aggregate,
//! persist it, then zero or evict whatever the snapshot no longer reports.
//!
//! # Modules
//!
//! - [`aggregator`] -- Meta entry computation from a snapshot.
//! - [`config`] -- Configuration loading from `hubwatch-config.yaml`.
//! - [`memory`] -- [`MemoryStore`], an in-process [`Store`].
//! - [`meta`] -- [`MetaHandle`], the published latest meta entry.
//! - [`reconciler`] -- Alive/zero/evict classification and its write-set.
//! - [`recorder`] -- History point emission.
//! - [`report`] -- Per-cycle outcome reporting.
//! - [`scheduler`] -- The scraping/idle state machine driving each cycle.
//! - [`source`] -- [`SnapshotSource`] trait.
//! - [`stats`] -- Hourly and weekday averages over history.
//! - [`store`] -- [`Store`] trait.
//!
//! [`MemoryStore`]: memory::MemoryStore
//! [`MetaHandle`]: meta::MetaHandle
//! [`SnapshotSource`]: source::SnapshotSource
//! [`Store`]: store::Store

pub mod aggregator;
pub mod config;
pub mod memory;
pub mod meta;
pub mod reconciler;
pub mod recorder;
pub mod report;
pub mod scheduler;
pub mod source;
pub mod stats;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
