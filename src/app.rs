//! Application state and navigation logic.

use std::time::Instant;

use tokio::sync::watch;

use crate::data::{Group, GroupState, Snapshot};
use crate::ui::Theme;

/// Main application state.
///
/// The app is a pure observer: it drains snapshots published by the
/// [`Poller`](crate::Poller) and tracks what the operator is looking at.
/// Pausing and refreshing are expressed as flags here; the run loop owns
/// the poller and applies them.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    /// Operator paused live polling ('p'). The run loop stops/starts the
    /// poller to match.
    pub paused: bool,

    /// Operator asked for a one-shot refresh ('r') while paused.
    pub refresh_requested: bool,

    /// Latest snapshot received from the poller.
    pub snapshot: Option<Snapshot>,

    /// When the current snapshot was applied.
    pub last_update: Option<Instant>,

    // Navigation state
    pub selected_group_index: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,

    groups: Vec<Group>,
    receiver: watch::Receiver<Option<Snapshot>>,
    source_description: String,
}

impl App {
    /// Create a new App observing the given snapshot channel.
    pub fn new(
        groups: Vec<Group>,
        receiver: watch::Receiver<Option<Snapshot>>,
        source_description: String,
    ) -> Self {
        Self {
            running: true,
            show_help: false,
            show_detail_overlay: false,
            paused: false,
            refresh_requested: false,
            snapshot: None,
            last_update: None,
            selected_group_index: 0,
            theme: Theme::auto_detect(),
            status_message: None,
            groups,
            receiver,
            source_description,
        }
    }

    /// Returns a description of the underlying status source.
    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    /// The configured group schema.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Drain any newly published snapshot.
    ///
    /// Returns true when the view changed. Called once per run-loop
    /// iteration; the watch channel keeps only the latest value, so a slow
    /// UI never sees superseded snapshots.
    pub fn apply_updates(&mut self) -> bool {
        if self.receiver.has_changed().unwrap_or(false) {
            self.snapshot = self.receiver.borrow_and_update().clone();
            self.last_update = Some(Instant::now());

            // Clamp selection to the new group list
            if let Some(ref snapshot) = self.snapshot {
                let max = snapshot.groups.len().saturating_sub(1);
                self.selected_group_index = self.selected_group_index.min(max);
            }
            true
        } else {
            false
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Move selection down by one group.
    pub fn select_next(&mut self) {
        let max = self.group_count().saturating_sub(1);
        self.selected_group_index = (self.selected_group_index + 1).min(max);
    }

    /// Move selection up by one group.
    pub fn select_prev(&mut self) {
        self.selected_group_index = self.selected_group_index.saturating_sub(1);
    }

    /// Jump to the first group.
    pub fn select_first(&mut self) {
        self.selected_group_index = 0;
    }

    /// Jump to the last group.
    pub fn select_last(&mut self) {
        self.selected_group_index = self.group_count().saturating_sub(1);
    }

    fn group_count(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.groups.len())
    }

    /// The composite state of the selected group, if any.
    pub fn selected_group_state(&self) -> Option<&GroupState> {
        self.snapshot.as_ref()?.groups.get(self.selected_group_index)
    }

    /// The configuration of the selected group.
    ///
    /// Group states are computed in configured order, so the selection
    /// index is valid for both lists.
    pub fn selected_group(&self) -> Option<&Group> {
        self.groups.get(self.selected_group_index)
    }

    /// Open the detail overlay for the currently selected group.
    pub fn enter_detail(&mut self) {
        if self.selected_group_state().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Navigate back: close overlays before anything else.
    pub fn go_back(&mut self) {
        if self.show_help {
            self.show_help = false;
        } else if self.show_detail_overlay {
            self.show_detail_overlay = false;
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Toggle live polling on/off.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        let label = if self.paused { "paused" } else { "live" };
        self.set_status_message(format!("Polling {}", label));
    }

    /// Ask the run loop for a one-shot refresh.
    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WorkerStatus;
    use crate::source::StatusReport;

    fn app_with_channel() -> (watch::Sender<Option<Snapshot>>, App) {
        let (tx, rx) = watch::channel(None);
        let app = App::new(Group::defaults(), rx, "test".to_string());
        (tx, app)
    }

    fn snapshot(group_count: usize) -> Snapshot {
        let groups: Vec<Group> = Group::defaults().into_iter().take(group_count).collect();
        Snapshot::from_report(&StatusReport::default(), &groups)
    }

    #[test]
    fn test_apply_updates_picks_up_snapshot() {
        let (tx, mut app) = app_with_channel();
        assert!(!app.apply_updates());
        assert!(app.snapshot.is_none());

        tx.send(Some(snapshot(4))).unwrap();
        assert!(app.apply_updates());
        assert!(app.snapshot.is_some());
        assert!(app.last_update.is_some());

        // No change since last drain
        assert!(!app.apply_updates());
    }

    #[test]
    fn test_selection_clamped_to_group_count() {
        let (tx, mut app) = app_with_channel();
        tx.send(Some(snapshot(4))).unwrap();
        app.apply_updates();

        app.select_last();
        assert_eq!(app.selected_group_index, 3);

        // A smaller snapshot pulls the selection back in range
        tx.send(Some(snapshot(2))).unwrap();
        app.apply_updates();
        assert_eq!(app.selected_group_index, 1);
    }

    #[test]
    fn test_selection_navigation_bounds() {
        let (tx, mut app) = app_with_channel();
        tx.send(Some(snapshot(2))).unwrap();
        app.apply_updates();

        app.select_prev();
        assert_eq!(app.selected_group_index, 0);
        app.select_next();
        assert_eq!(app.selected_group_index, 1);
        app.select_next();
        assert_eq!(app.selected_group_index, 1);
    }

    #[test]
    fn test_go_back_closes_help_before_detail() {
        let (tx, mut app) = app_with_channel();
        tx.send(Some(snapshot(4))).unwrap();
        app.apply_updates();

        app.enter_detail();
        app.toggle_help();
        assert!(app.show_help && app.show_detail_overlay);

        app.go_back();
        assert!(!app.show_help && app.show_detail_overlay);
        app.go_back();
        assert!(!app.show_detail_overlay);
    }

    #[test]
    fn test_selected_group_tracks_state_index() {
        let (tx, mut app) = app_with_channel();
        tx.send(Some(snapshot(4))).unwrap();
        app.apply_updates();

        app.select_next();
        let state = app.selected_group_state().unwrap();
        let group = app.selected_group().unwrap();
        assert_eq!(state.id, group.id);
        // No workers in the report, so every group is in the no-data state.
        assert_eq!(state.status, WorkerStatus::Error);
    }

    #[test]
    fn test_toggle_pause_sets_message() {
        let (_tx, mut app) = app_with_channel();
        app.toggle_pause();
        assert!(app.paused);
        assert_eq!(app.get_status_message(), Some("Polling paused"));
        app.toggle_pause();
        assert!(!app.paused);
    }
}
