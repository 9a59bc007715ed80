//! Status source abstraction.
//!
//! This module provides a trait-based abstraction for fetching worker
//! status reports from various backends - the production HTTP endpoint, a
//! JSON file, or an in-memory channel.

mod channel;
mod file;
mod http;
mod report;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use http::HttpSource;
pub use report::{DomainReport, StatusReport, SummaryCounts};

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when fetching a status report.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Request failed in transit.
    #[error("request failed: {0}")]
    Transport(String),

    /// Connection to the endpoint failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for a response.
    #[error("request timed out")]
    Timeout,

    /// Endpoint answered with a non-success HTTP status.
    #[error("endpoint returned status {0}")]
    Status(u16),

    /// Failed to parse the response body.
    #[error("failed to parse report: {0}")]
    Parse(String),

    /// The source has no report to offer yet.
    #[error("no report available")]
    Unavailable,
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_connect() {
            SourceError::Connection(err.to_string())
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

/// Trait for fetching worker status reports.
///
/// Implementations provide one report per call; cadence and cancellation
/// are the poller's business. The poller drops the returned future when a
/// newer cycle supersedes the fetch, so implementations must tolerate being
/// cancelled at any await point.
///
/// # Example
///
/// ```
/// use sync_doctor::{ChannelSource, StatusSource};
///
/// let (_tx, source) = ChannelSource::create("embedded");
/// assert_eq!(source.description(), "channel: embedded");
/// ```
#[async_trait]
pub trait StatusSource: Send + Sync + Debug {
    /// Fetch the current status report.
    async fn fetch(&self) -> Result<StatusReport, SourceError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}
