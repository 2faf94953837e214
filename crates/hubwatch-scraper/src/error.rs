//! Error types for the listing scraper.
//!
//! [`ScrapeError`] keeps the transport detail; the poll cycle only sees the
//! coarser [`SourceError`] it converts into.

use hubwatch_core::source::SourceError;

/// Errors that can occur while fetching or decoding the listing.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The HTTP client could not be built from configuration.
    #[error("client build error: {0}")]
    Client(String),

    /// The request failed before a response arrived.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The request exceeded the client timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The listing answered with a non-success status.
    #[error("listing returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder if it could not be read.
        body: String,
    },

    /// The response body is not a valid listing.
    #[error("listing parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<ScrapeError> for SourceError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::Timeout { timeout_ms } => Self::Timeout { timeout_ms },
            ScrapeError::Parse(_) => Self::Malformed {
                message: err.to_string(),
            },
            ScrapeError::Client(_) | ScrapeError::Request(_) | ScrapeError::Status { .. } => {
                Self::Unreachable {
                    message: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_unreachable() {
        let err = ScrapeError::Status {
            status: 502,
            body: "bad gateway".to_owned(),
        };
        let source: SourceError = err.into();
        assert!(matches!(source, SourceError::Unreachable { ref message } if message.contains("502")));
    }

    #[test]
    fn parse_maps_to_malformed() {
        let json_err = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        let source: SourceError = ScrapeError::from(json_err).into();
        assert!(matches!(source, SourceError::Malformed { .. }));
    }

    #[test]
    fn timeout_keeps_deadline() {
        let source: SourceError = ScrapeError::Timeout { timeout_ms: 1500 }.into();
        assert_eq!(source, SourceError::Timeout { timeout_ms: 1500 });
    }
}
