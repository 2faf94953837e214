//! Observer API server for hubwatch.
//!
//! This crate provides a read-only Axum HTTP server that exposes the
//! reconciled listing as JSON:
//!
//! - **Listing endpoints** for the current entries and a single entry
//! - **History endpoints** for an entry's recent timeline and its hourly
//!   or weekday averages
//! - **Hub endpoint** for the latest meta aggregate
//! - **Health endpoint** for liveness probes
//!
//! # Architecture
//!
//! Handlers read through the same [`StoreBackend`] the poll cycle writes
//! to, and take the meta aggregate from a [`MetaHandle`] so the latest
//! total is served without a store round-trip. The observer never writes.
//!
//! [`StoreBackend`]: hubwatch_db::StoreBackend
//! [`MetaHandle`]: hubwatch_core::meta::MetaHandle

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;

pub use error::ObserverError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::spawn_observer;
pub use state::AppState;
