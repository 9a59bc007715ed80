//! Channel-backed status source.
//!
//! Serves whatever report was last pushed through a tokio watch channel.
//! Designed for embedding the poller behind another transport and for
//! tests that need full control over what a fetch returns.

use tokio::sync::watch;

use async_trait::async_trait;

use super::{SourceError, StatusReport, StatusSource};

/// A data source that serves reports pushed through a channel.
///
/// # Example
///
/// ```
/// use sync_doctor::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("bridge");
/// tx.send(Some(Default::default())).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<StatusReport>>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - Where reports come from (e.g. "bridge",
    ///   "mqtt://broker:1883")
    pub fn new(
        receiver: watch::Receiver<Option<StatusReport>>,
        source_description: &str,
    ) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
        }
    }

    /// Create a channel pair for pushing reports to a ChannelSource.
    ///
    /// Returns (sender, source); the source reports
    /// [`SourceError::Unavailable`] until the first report is sent.
    pub fn create(source_description: &str) -> (watch::Sender<Option<StatusReport>>, Self) {
        let (tx, rx) = watch::channel(None);
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

#[async_trait]
impl StatusSource for ChannelSource {
    async fn fetch(&self) -> Result<StatusReport, SourceError> {
        self.receiver.borrow().clone().ok_or(SourceError::Unavailable)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_source_empty_until_first_send() {
        let (tx, source) = ChannelSource::create("test");

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable));

        tx.send(Some(StatusReport::default())).unwrap();
        assert!(source.fetch().await.is_ok());
    }

    #[tokio::test]
    async fn test_channel_source_serves_latest_report() {
        let (tx, source) = ChannelSource::create("test");

        let report = StatusReport {
            ok: true,
            ..Default::default()
        };
        tx.send(Some(report)).unwrap();

        // Fetch is repeatable: the same report until a newer one arrives.
        assert!(source.fetch().await.unwrap().ok);
        assert!(source.fetch().await.unwrap().ok);

        let newer = StatusReport {
            checked_at: Some("later".to_string()),
            ..Default::default()
        };
        tx.send(Some(newer)).unwrap();
        assert_eq!(
            source.fetch().await.unwrap().checked_at.as_deref(),
            Some("later")
        );
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("mqtt://broker:1883");
        assert_eq!(source.description(), "channel: mqtt://broker:1883");
    }
}
