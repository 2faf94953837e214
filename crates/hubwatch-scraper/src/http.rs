//! [`SnapshotSource`] backed by an HTTP JSON listing.

use std::time::Duration;

use chrono::{DateTime, Utc};
use hubwatch_core::config::ScraperConfig;
use hubwatch_core::source::{SnapshotSource, SourceError};
use hubwatch_types::Entry;

use crate::error::ScrapeError;
use crate::listing;

/// Fetches the server listing over HTTP on every cycle.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpSnapshotSource {
    /// Build a source from scraper configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ScrapeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: config.source_url.clone(),
            timeout: config.timeout(),
        })
    }

    /// The listing URL this source polls.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode the raw listing.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] on transport failure, a non-success status,
    /// or an undecodable body.
    pub async fn fetch(&self) -> Result<Vec<listing::Listing>, ScrapeError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(|e| self.request_error(e))?;
        Ok(listing::parse(&body)?)
    }

    fn request_error(&self, err: reqwest::Error) -> ScrapeError {
        if err.is_timeout() {
            ScrapeError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            ScrapeError::Request(err)
        }
    }
}

impl SnapshotSource for HttpSnapshotSource {
    async fn acquire(&self, now: DateTime<Utc>) -> Result<Vec<Entry>, SourceError> {
        let listings = self.fetch().await.map_err(|e| {
            tracing::warn!(url = %self.url, error = %e, "Listing fetch failed");
            SourceError::from(e)
        })?;
        let received = listings.len();
        let entries = listing::normalise(now, listings);

        tracing::debug!(
            url = %self.url,
            received,
            kept = entries.len(),
            "Fetched listing"
        );
        Ok(entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_config() {
        let config = ScraperConfig {
            source_url: "http://listing.invalid/servers.json".to_owned(),
            timeout_secs: 3,
            ..ScraperConfig::default()
        };
        let source = HttpSnapshotSource::new(&config).unwrap();
        assert_eq!(source.url(), "http://listing.invalid/servers.json");
        assert_eq!(source.timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn unreachable_listing_is_source_error() {
        // Port 9 (discard) on localhost is closed on CI hosts.
        let config = ScraperConfig {
            source_url: "http://127.0.0.1:9/servers.json".to_owned(),
            timeout_secs: 2,
            ..ScraperConfig::default()
        };
        let source = HttpSnapshotSource::new(&config).unwrap();
        let now = Utc::now();

        let err = source.acquire(now).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Unreachable { .. } | SourceError::Timeout { .. }
        ));
    }
}
