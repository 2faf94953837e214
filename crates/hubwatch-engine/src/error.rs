//! Error types for the engine binary.
//!
//! [`EngineError`] covers startup failures and the unexpected end of
//! either long-running task.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: hubwatch_core::config::ConfigError,
    },

    /// The storage backend could not be initialised.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying database error.
        #[from]
        source: hubwatch_db::DbError,
    },

    /// The snapshot source could not be built.
    #[error("scraper error: {source}")]
    Scraper {
        /// The underlying scrape error.
        #[from]
        source: hubwatch_scraper::ScrapeError,
    },

    /// Observer API server failed to start or stopped serving.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying server error.
        #[from]
        source: hubwatch_observer::ServerError,
    },

    /// The observer task ended without an error of its own.
    #[error("observer task ended: {message}")]
    ObserverExited {
        /// Description of how the task ended.
        message: String,
    },

    /// The poll loop task ended unexpectedly.
    #[error("scheduler task ended: {message}")]
    Scheduler {
        /// Description of how the task ended.
        message: String,
    },
}
