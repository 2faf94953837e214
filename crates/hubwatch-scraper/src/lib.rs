//! HTTP snapshot source for hubwatch.
//!
//! Fetches the public server listing as JSON, normalises it into entries,
//! and hands it to the poll cycle through the
//! [`SnapshotSource`](hubwatch_core::source::SnapshotSource) trait.
//!
//! # Modules
//!
//! - [`http`] -- [`HttpSnapshotSource`], the `reqwest`-backed source
//! - [`listing`] -- Wire format of the listing and its normalisation
//! - [`error`] -- Scrape error types

pub mod error;
pub mod http;
pub mod listing;

pub use error::ScrapeError;
pub use http::HttpSnapshotSource;
pub use listing::{Listing, normalise};
