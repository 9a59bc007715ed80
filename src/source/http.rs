//! HTTP status source.
//!
//! Fetches status reports from the sync backend's JSON endpoint. This is
//! the production source; one GET per poll cycle.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{SourceError, StatusReport, StatusSource};

/// Default per-request timeout.
///
/// Generous compared to the poll interval; a request that outlives the
/// interval is superseded by the poller before this fires anyway.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A data source that fetches status reports over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
    description: String,
}

impl HttpSource {
    /// Create a new HTTP source for the given endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(client, url)
    }

    /// Create an HTTP source with a caller-supplied client, for custom
    /// timeouts, proxies, or auth middleware.
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        let url = url.into();
        let description = format!("http: {}", url);
        Self {
            client,
            url,
            description,
        }
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StatusSource for HttpSource {
    async fn fetch(&self) -> Result<StatusReport, SourceError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let report: StatusReport = response.json().await?;
        debug!(domains = report.domains.len(), "fetched status report");
        Ok(report)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
