//! Polling lifecycle for the status endpoint.
//!
//! The poller owns the fetch cycle: at most one in-flight request, a
//! fixed-interval timer while observers are watching, and cooperative
//! cancellation whenever a newer cycle or `stop()` supersedes a pending
//! request. Each successful fetch is folded through the data pipeline into
//! a [`Snapshot`] and published on a watch channel; the presentation layer
//! only ever sees those immutable values.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::data::{Group, Snapshot};
use crate::source::{SourceError, StatusReport, StatusSource};

/// Default delay between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);

/// Drives periodic status fetches and publishes snapshots to observers.
///
/// A poller is either idle (no timer, no in-flight request) or polling
/// (timer armed, zero or one request outstanding). [`start`](Poller::start)
/// and [`stop`](Poller::stop) are idempotent, so rapid open/close from the
/// UI can never leak a timer or leave a request running.
///
/// # Example
///
/// ```
/// use sync_doctor::{ChannelSource, Group, Poller};
///
/// let (_tx, source) = ChannelSource::create("embedded");
/// let poller = Poller::new(std::sync::Arc::new(source), Group::defaults());
/// let rx = poller.subscribe();
/// assert!(rx.borrow().is_none()); // nothing fetched yet
/// assert!(!poller.is_polling());
/// ```
#[derive(Debug)]
pub struct Poller {
    source: Arc<dyn StatusSource>,
    groups: Arc<[Group]>,
    interval: Duration,
    tx: watch::Sender<Option<Snapshot>>,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    /// Create a poller with the default interval.
    pub fn new(source: Arc<dyn StatusSource>, groups: Vec<Group>) -> Self {
        Self::with_interval(source, groups, DEFAULT_POLL_INTERVAL)
    }

    /// Create a poller with a custom poll interval.
    pub fn with_interval(
        source: Arc<dyn StatusSource>,
        groups: Vec<Group>,
        interval: Duration,
    ) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            source,
            groups: groups.into(),
            interval,
            tx,
            task: None,
        }
    }

    /// Subscribe to computed snapshots.
    ///
    /// Holds `None` until the first fetch lands. Subscribe before calling
    /// [`start`](Poller::start); the loop shuts itself down once every
    /// receiver is gone.
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.tx.subscribe()
    }

    /// The configured group schema, in presentation order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Whether the poll loop is currently armed.
    pub fn is_polling(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Run a single fetch outside the poll loop and publish the result.
    ///
    /// This is the startup one-shot that populates the summary before
    /// anyone opens the panel; it does not arm the timer.
    pub async fn refresh_once(&self) {
        let result = self.source.fetch().await;
        publish(result, &self.groups, &self.tx);
    }

    /// Arm the poll loop: an immediate fetch, then one per interval tick.
    ///
    /// No-op when already polling.
    pub fn start(&mut self) {
        if self.is_polling() {
            return;
        }

        let source = Arc::clone(&self.source);
        let groups = Arc::clone(&self.groups);
        let tx = self.tx.clone();
        let interval = self.interval;

        self.task = Some(tokio::spawn(poll_loop(source, groups, interval, tx)));
    }

    /// Disarm the timer and abort any in-flight request.
    ///
    /// The aborted request is superseded, not failed: it publishes neither
    /// a snapshot nor an error. No-op when already idle.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("poller stopped");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    source: Arc<dyn StatusSource>,
    groups: Arc<[Group]>,
    interval: Duration,
    tx: watch::Sender<Option<Snapshot>>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    'cycle: loop {
        // One fetch per tick; the first tick completes immediately, so
        // arming the loop also issues the initial fetch.
        ticker.tick().await;

        loop {
            let fetch_source = Arc::clone(&source);
            tokio::select! {
                result = async move { fetch_source.fetch().await } => {
                    if !publish(result, &groups, &tx) {
                        // Every observer is gone; nothing left to publish to.
                        return;
                    }
                    continue 'cycle;
                }
                _ = ticker.tick() => {
                    // The next cycle arrived first: the select drops the
                    // pending fetch, cancelling its request, and the inner
                    // loop starts the replacement immediately. At most one
                    // request is ever outstanding, and an old response can
                    // never overwrite a newer snapshot.
                    debug!("superseding stale status fetch");
                }
            }
        }
    }
}

/// Fold a fetch result into a snapshot and hand it to observers.
///
/// Returns false when all receivers have been dropped.
fn publish(
    result: Result<StatusReport, SourceError>,
    groups: &[Group],
    tx: &watch::Sender<Option<Snapshot>>,
) -> bool {
    let snapshot = match result {
        Ok(report) => Snapshot::from_report(&report, groups),
        Err(err) => {
            warn!(error = %err, "status fetch failed");
            Snapshot::from_fetch_error(err.to_string())
        }
    };
    tx.send(Some(snapshot)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RunMode, WorkerStatus};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_groups() -> Vec<Group> {
        vec![Group {
            id: "rt".to_string(),
            label: "Sales sync".to_string(),
            keys: vec!["rt_sales_sync".to_string()],
            description: String::new(),
            default_mode: RunMode::Auto,
        }]
    }

    fn sample_report() -> StatusReport {
        serde_json::from_str(
            r#"{
                "domains": {
                    "rt": { "workers": [ { "key": "rt_sales_sync", "status": "ok" } ] }
                },
                "ok": true,
                "checked_at": "14:02"
            }"#,
        )
        .unwrap()
    }

    /// Source with a configurable response delay and failure mode; counts
    /// how many fetches were started.
    #[derive(Debug)]
    struct StubSource {
        delay: Duration,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl StubSource {
        fn new(delay_ms: u64, fail: bool) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Arc::new(Self {
                delay: Duration::from_millis(delay_ms),
                fail,
                calls: Arc::clone(&calls),
            });
            (source, calls)
        }
    }

    #[async_trait]
    impl StatusSource for StubSource {
        async fn fetch(&self) -> Result<StatusReport, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                Err(SourceError::Transport("stub failure".to_string()))
            } else {
                Ok(sample_report())
            }
        }

        fn description(&self) -> &str {
            "stub"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_once_populates_without_arming() {
        let (source, calls) = StubSource::new(0, false);
        let poller = Poller::new(source, test_groups());
        let rx = poller.subscribe();

        poller.refresh_once().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!poller.is_polling());

        let snapshot = rx.borrow().clone().unwrap();
        assert_eq!(snapshot.overall.status, WorkerStatus::Ok);
        assert_eq!(snapshot.overall.label, "all workers clear");
        assert_eq!(snapshot.checked_at, "14:02");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_publishes_error_snapshot() {
        let (source, _calls) = StubSource::new(0, true);
        let poller = Poller::new(source, test_groups());
        let rx = poller.subscribe();

        poller.refresh_once().await;

        let snapshot = rx.borrow().clone().unwrap();
        assert_eq!(snapshot.overall.status, WorkerStatus::Error);
        assert!(snapshot.groups.is_empty());
        assert!(snapshot.error.as_deref().unwrap().contains("stub failure"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_fetches_immediately_then_per_tick() {
        let (source, calls) = StubSource::new(0, false);
        let mut poller = Poller::with_interval(source, test_groups(), Duration::from_secs(4));
        let rx = poller.subscribe();

        poller.start();
        assert!(poller.is_polling());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(rx.borrow().is_some());

        // Ticks at t=4s and t=8s.
        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        poller.stop();
        assert!(!poller.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_is_one_cycle() {
        let (source, calls) = StubSource::new(0, false);
        let mut poller = Poller::with_interval(source, test_groups(), Duration::from_secs(4));
        let _rx = poller.subscribe();

        poller.start();
        poller.start();

        tokio::time::sleep(Duration::from_secs(1)).await;
        // One timer, one immediate fetch - not two of each.
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(8)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_superseded_by_next_tick() {
        // Each fetch takes 6s against a 4s interval, so no fetch ever
        // completes: every tick cancels the previous request and starts a
        // fresh one. A superseded request is silent - no snapshot, no error.
        let (source, calls) = StubSource::new(6_000, false);
        let mut poller = Poller::with_interval(source, test_groups(), Duration::from_secs(4));
        let rx = poller.subscribe();

        poller.start();
        tokio::time::sleep(Duration::from_secs(11)).await;

        // Fetches started at t=0, 4, 8; none allowed to finish.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(rx.borrow().is_none());

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_aborts_in_flight_silently() {
        let (source, calls) = StubSource::new(2_000, false);
        let mut poller = Poller::with_interval(source, test_groups(), Duration::from_secs(10));
        let rx = poller.subscribe();

        poller.start();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        poller.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;

        // The aborted request produced nothing.
        assert!(rx.borrow().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!poller.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_leaves_no_orphan_timer() {
        let (source, calls) = StubSource::new(0, false);
        let mut poller = Poller::with_interval(source, test_groups(), Duration::from_secs(4));
        let _rx = poller.subscribe();

        poller.start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        poller.stop();
        poller.start();

        // New timer ticks at t=0.1s (immediate) and t=4.1s. The old timer
        // would have fired at t=4.0s; if it were orphaned we'd see a fourth
        // fetch.
        tokio::time::sleep(Duration::from_millis(4_050)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_error_snapshot() {
        let (tx, source) = crate::source::ChannelSource::create("test");
        let poller = Poller::new(Arc::new(source), test_groups());
        let rx = poller.subscribe();

        // Channel starts empty: fetch errors, snapshot carries the failure.
        poller.refresh_once().await;
        assert!(rx.borrow().clone().unwrap().error.is_some());

        // Once a report arrives the next cycle clears the error flag.
        tx.send(Some(sample_report())).unwrap();
        poller.refresh_once().await;
        let snapshot = rx.borrow().clone().unwrap();
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.overall.status, WorkerStatus::Ok);
    }
}
