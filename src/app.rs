//! Application state and navigation logic.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};

use crate::data::{export_window, BatchStore, Parameter};
use crate::dispatch::dispatch;
use crate::feed::{Feed, FeedEvent, LinkStatus};
use crate::settings::Settings;
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// All units at a glance: tier, score, live readings.
    Overview,
    /// Chart of the selected unit's recent window.
    Trends,
    /// Merged advisory list across all units.
    Advisories,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Trends,
            View::Trends => View::Advisories,
            View::Advisories => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Advisories,
            View::Trends => View::Overview,
            View::Advisories => View::Trends,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Trends => "Trends",
            View::Advisories => "Advisories",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Stream input
    feed: Box<dyn Feed>,
    pub store: BatchStore,
    pub link: LinkStatus,
    pub last_fault: Option<String>,
    pub last_update: Option<Instant>,

    // Navigation state
    pub selected_unit_index: usize,
    pub selected_advisory_index: usize,
    /// Parameter charted in the Trends view.
    pub trend_param: Parameter,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from the given feed.
    pub fn new(feed: Box<dyn Feed>, settings: &Settings) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            feed,
            store: BatchStore::with_units(settings.units),
            link: LinkStatus::Connecting,
            last_fault: None,
            last_update: None,
            selected_unit_index: 0,
            selected_advisory_index: 0,
            trend_param: Parameter::Ph,
            theme: Theme::from_choice(settings.theme),
            status_message: None,
        }
    }

    /// Returns a description of the current feed.
    pub fn feed_description(&self) -> &str {
        self.feed.description()
    }

    /// Drain pending feed events into the store.
    ///
    /// Frames go through the dispatcher; link changes and faults update
    /// the header state. Returns the number of measurements applied.
    pub fn pump_feed(&mut self) -> usize {
        let mut applied = 0;

        while let Some(event) = self.feed.poll() {
            match event {
                FeedEvent::Frame(frame) => {
                    for (unit_id, outcome) in dispatch(&mut self.store, &frame) {
                        applied += 1;
                        if let Some(advisory) = outcome.advisory {
                            self.set_status_message(format!(
                                "Batch {}: {}",
                                unit_id, advisory.title
                            ));
                        }
                    }
                }
                FeedEvent::Link(status) => {
                    if status == LinkStatus::Connected {
                        self.last_fault = None;
                    }
                    self.link = status;
                }
                FeedEvent::Fault(reason) => {
                    self.last_fault = Some(reason);
                }
            }
        }

        if applied > 0 {
            self.last_update = Some(Instant::now());
            self.clamp_selection();
        }
        applied
    }

    /// The unit the Overview/Trends selection points at.
    pub fn selected_unit_id(&self) -> Option<u32> {
        self.store.unit_ids().get(self.selected_unit_index).copied()
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

    /// Switch to the next view (cycles Overview → Trends → Advisories).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        match self.current_view {
            View::Overview | View::Trends => {
                let max = self.store.len().saturating_sub(1);
                self.selected_unit_index = (self.selected_unit_index + n).min(max);
            }
            View::Advisories => {
                let max = self.store.all_advisories().len().saturating_sub(1);
                self.selected_advisory_index = (self.selected_advisory_index + n).min(max);
            }
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        match self.current_view {
            View::Overview | View::Trends => {
                self.selected_unit_index = self.selected_unit_index.saturating_sub(n);
            }
            View::Advisories => {
                self.selected_advisory_index = self.selected_advisory_index.saturating_sub(n);
            }
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        match self.current_view {
            View::Overview | View::Trends => self.selected_unit_index = 0,
            View::Advisories => self.selected_advisory_index = 0,
        }
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        match self.current_view {
            View::Overview | View::Trends => {
                self.selected_unit_index = self.store.len().saturating_sub(1);
            }
            View::Advisories => {
                self.selected_advisory_index =
                    self.store.all_advisories().len().saturating_sub(1);
            }
        }
    }

    fn clamp_selection(&mut self) {
        let units = self.store.len().saturating_sub(1);
        self.selected_unit_index = self.selected_unit_index.min(units);
        let advisories = self.store.all_advisories().len().saturating_sub(1);
        self.selected_advisory_index = self.selected_advisory_index.min(advisories);
    }

    /// Cycle the parameter charted in the Trends view.
    pub fn cycle_param(&mut self) {
        self.trend_param = self.trend_param.next();
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Close the help overlay, or fall back to the Overview tab.
    pub fn go_back(&mut self) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.current_view != View::Overview {
            self.current_view = View::Overview;
        }
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the selected unit's window as CSV into the working
    /// directory. Returns the written path.
    pub fn export_selected(&self) -> Result<PathBuf> {
        let Some(unit_id) = self.selected_unit_id() else {
            bail!("no unit selected");
        };
        let Some(record) = self.store.record(unit_id) else {
            bail!("unit {} is not tracked", unit_id);
        };
        if record.window.is_empty() {
            bail!("batch {} has no data yet", unit_id);
        }
        export_window(record, Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::ChannelFeed;

    fn update_frame(batch: u32, score: f64) -> String {
        format!(
            r#"{{"type":"batch_update","batch_number":{batch},
               "data_point":{{"timestamp":1.0,"ph":5.7,"temperature":19.0,"co2":1.0}},
               "comparison":{{"actual":{{"ph":5.7,"temperature":19.0,"co2":1.0}},
                              "ideal":{{"ph":5.7,"temperature":19.0,"co2":1.0}},
                              "quality_score":{score}}}}}"#
        )
    }

    fn test_app() -> (tokio::sync::mpsc::Sender<FeedEvent>, App) {
        let (tx, feed) = ChannelFeed::create("test");
        let app = App::new(Box::new(feed), &Settings::default());
        (tx, app)
    }

    #[tokio::test]
    async fn test_pump_feed_applies_frames_and_link_changes() {
        let (tx, mut app) = test_app();

        tx.send(FeedEvent::Link(LinkStatus::Connected)).await.unwrap();
        tx.send(FeedEvent::Frame(update_frame(1, 96.0))).await.unwrap();
        tx.send(FeedEvent::Frame(update_frame(2, 85.0))).await.unwrap();

        assert_eq!(app.pump_feed(), 2);
        assert_eq!(app.link, LinkStatus::Connected);
        assert!(app.last_update.is_some());
        assert_eq!(app.store.record(1).unwrap().window.len(), 1);
        assert_eq!(app.store.record(2).unwrap().window.len(), 1);
    }

    #[tokio::test]
    async fn test_tier_drop_raises_a_status_toast() {
        let (tx, mut app) = test_app();

        tx.send(FeedEvent::Frame(update_frame(1, 96.0))).await.unwrap();
        app.pump_feed();
        assert!(app.get_status_message().is_none());

        tx.send(FeedEvent::Frame(update_frame(1, 85.0))).await.unwrap();
        app.pump_feed();

        let message = app.get_status_message().unwrap();
        assert!(message.starts_with("Batch 1:"), "got {:?}", message);
    }

    #[tokio::test]
    async fn test_fault_is_kept_until_reconnect() {
        let (tx, mut app) = test_app();

        tx.send(FeedEvent::Fault("connect failed: refused".to_string()))
            .await
            .unwrap();
        app.pump_feed();
        assert_eq!(app.last_fault.as_deref(), Some("connect failed: refused"));

        tx.send(FeedEvent::Link(LinkStatus::Connected)).await.unwrap();
        app.pump_feed();
        assert!(app.last_fault.is_none());
    }

    #[tokio::test]
    async fn test_selection_stays_within_unit_list() {
        let (_tx, mut app) = test_app();

        app.select_next_n(10);
        assert_eq!(app.selected_unit_index, 3);
        app.select_prev_n(10);
        assert_eq!(app.selected_unit_index, 0);
        assert_eq!(app.selected_unit_id(), Some(1));
    }
}
