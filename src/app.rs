//! Application state and navigation logic.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::debug;

use crate::config::DEFAULT_EXPORT_PATH;
use crate::data::{DashboardData, StatusClass, Trace};
use crate::source::DataSource;
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Trace detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Health, CPU, uptime and the bucket chart.
    Overview,
    /// Table of recorded HTTP traces.
    Traces,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Traces,
            View::Traces => View::Overview,
        }
    }

    pub fn prev(self) -> Self {
        // Only two views, so prev and next coincide
        self.next()
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Traces => "Traces",
        }
    }
}

/// Which bucket the Traces view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceFilter {
    #[default]
    All,
    Class(StatusClass),
}

impl TraceFilter {
    pub fn next(self) -> Self {
        let classes = StatusClass::ALL;
        match self {
            TraceFilter::All => TraceFilter::Class(classes[0]),
            TraceFilter::Class(class) => match classes.iter().position(|c| *c == class) {
                Some(i) if i + 1 < classes.len() => TraceFilter::Class(classes[i + 1]),
                _ => TraceFilter::All,
            },
        }
    }

    pub fn prev(self) -> Self {
        let classes = StatusClass::ALL;
        match self {
            TraceFilter::All => TraceFilter::Class(classes[classes.len() - 1]),
            TraceFilter::Class(class) => match classes.iter().position(|c| *c == class) {
                Some(i) if i > 0 => TraceFilter::Class(classes[i - 1]),
                _ => TraceFilter::All,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TraceFilter::All => "All",
            TraceFilter::Class(class) => class.label(),
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub data: DashboardData,
    pub load_error: Option<String>,
    pub last_refresh: Option<Instant>,

    // Navigation state
    pub selected_trace_index: usize,
    /// First trace row shown by the last Traces render. Mouse clicks are
    /// resolved against it.
    pub trace_scroll_offset: Cell<usize>,
    /// The trace most recently opened with Enter.
    pub selected_trace: Option<Trace>,
    pub trace_filter: TraceFilter,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,
    pub export_path: PathBuf,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from the given data source.
    pub fn new(source: Box<dyn DataSource>, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            show_detail_overlay: false,
            source,
            data: DashboardData::new(),
            load_error: None,
            last_refresh: None,
            selected_trace_index: 0,
            trace_scroll_offset: Cell::new(0),
            selected_trace: None,
            trace_filter: TraceFilter::All,
            filter_text: String::new(),
            filter_active: false,
            theme,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            status_message: None,
        }
    }

    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Ask the source to fetch all endpoints again.
    pub fn refresh(&mut self) {
        self.source.refresh();
        self.last_refresh = Some(Instant::now());
    }

    /// Apply every update the source has ready.
    ///
    /// Returns true if at least one update was applied.
    pub fn reload_data(&mut self) -> bool {
        self.load_error = self.source.error().map(str::to_string);

        let mut applied = 0;
        while let Some(update) = self.source.poll() {
            self.data.apply(update);
            applied += 1;
        }

        if applied > 0 {
            debug!(applied, "applied updates");
            self.clamp_selection();
        }
        applied > 0
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_traces().len();
        if self.selected_trace_index >= count {
            self.selected_trace_index = count.saturating_sub(1);
        }
    }

    /// Traces shown in the Traces view, after bucket and text filtering.
    pub fn visible_traces(&self) -> Vec<&Trace> {
        let base: &[Trace] = match self.trace_filter {
            TraceFilter::All => &self.data.traces,
            TraceFilter::Class(class) => self.data.buckets.bucket(class),
        };
        base.iter().filter(|t| self.matches_trace(t)).collect()
    }

    /// The trace under the cursor in the Traces view.
    pub fn highlighted_trace(&self) -> Option<&Trace> {
        self.visible_traces().get(self.selected_trace_index).copied()
    }

    /// Switch to the next view.
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
        if self.current_view == View::Traces {
            let max = self.visible_traces().len().saturating_sub(1);
            self.selected_trace_index = (self.selected_trace_index + n).min(max);
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        if self.current_view == View::Traces {
            self.selected_trace_index = self.selected_trace_index.saturating_sub(n);
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_trace_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        if self.current_view == View::Traces {
            self.selected_trace_index = self.visible_traces().len().saturating_sub(1);
        }
    }

    /// Select the highlighted trace and open the detail overlay.
    pub fn enter_detail(&mut self) {
        if self.current_view != View::Traces {
            return;
        }
        if let Some(trace) = self.highlighted_trace().cloned() {
            debug!(uri = %trace.request.uri, status = ?trace.response.status, "trace selected");
            self.selected_trace = Some(trace);
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then return to Overview.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        self.current_view = View::Overview;
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Show the next bucket (All → 200 → 400 → 404 → 500 → Other → All).
    pub fn cycle_bucket(&mut self) {
        self.trace_filter = self.trace_filter.next();
        self.selected_trace_index = 0;
    }

    pub fn cycle_bucket_back(&mut self) {
        self.trace_filter = self.trace_filter.prev();
        self.selected_trace_index = 0;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.selected_trace_index = 0;
    }

    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a trace's URI or method matches the current filter.
    pub fn matches_trace(&self, trace: &Trace) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let search = self.filter_text.to_lowercase();
        trace.request.uri.to_lowercase().contains(&search)
            || trace.request.method.to_lowercase().contains(&search)
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        self.data.write_export(path)
    }

    /// Export to the configured path and report the outcome in the status bar.
    pub fn export(&mut self) {
        let path = self.export_path.clone();
        match self.export_state(&path) {
            Ok(()) => self.set_status_message(format!("Exported to {}", path.display())),
            Err(e) => self.set_status_message(format!("Export failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{TraceRequest, TraceResponse};
    use crate::source::{ChannelSource, Endpoint, Update};
    use tokio::sync::mpsc;

    fn trace(method: &str, uri: &str, status: i64) -> Trace {
        Trace {
            timestamp: "2024-03-01T10:15:30Z".to_string(),
            request: TraceRequest {
                method: method.to_string(),
                uri: uri.to_string(),
                ..Default::default()
            },
            response: TraceResponse {
                status: Some(status),
                ..Default::default()
            },
            time_taken: Some(3),
        }
    }

    fn app_with_traces() -> (mpsc::Sender<Update>, App) {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Theme::dark());
        tx.try_send(Update::Traces(vec![
            trace("GET", "/orders", 200),
            trace("POST", "/orders", 400),
            trace("GET", "/missing", 404),
            trace("GET", "/orders/7", 200),
            trace("GET", "/boom", 503),
        ]))
        .unwrap();
        assert!(app.reload_data());
        (tx, app)
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Overview.next(), View::Traces);
        assert_eq!(View::Traces.next(), View::Overview);
        assert_eq!(View::Overview.prev(), View::Traces);
    }

    #[test]
    fn test_trace_filter_cycle() {
        let mut filter = TraceFilter::All;
        let mut labels = Vec::new();
        for _ in 0..6 {
            filter = filter.next();
            labels.push(filter.label());
        }
        assert_eq!(labels, vec!["200", "400", "404", "500", "Other", "All"]);
        assert_eq!(TraceFilter::All.prev(), TraceFilter::Class(StatusClass::Other));
        assert_eq!(TraceFilter::Class(StatusClass::Ok).prev(), TraceFilter::All);
    }

    #[test]
    fn test_reload_applies_all_pending_updates() {
        let (tx, mut app) = app_with_traces();
        assert_eq!(app.data.traces.len(), 5);
        assert!(!app.reload_data());

        tx.try_send(Update::Failed {
            endpoint: Endpoint::Health,
            error: "Request timed out".to_string(),
        })
        .unwrap();
        assert!(app.reload_data());
        assert_eq!(app.data.errors.get(&Endpoint::Health).unwrap(), "Request timed out");
        assert_eq!(app.data.traces.len(), 5);
    }

    #[test]
    fn test_visible_traces_by_bucket_and_text() {
        let (_tx, mut app) = app_with_traces();

        app.cycle_bucket();
        assert_eq!(app.trace_filter, TraceFilter::Class(StatusClass::Ok));
        let uris: Vec<&str> = app.visible_traces().iter().map(|t| t.request.uri.as_str()).collect();
        assert_eq!(uris, vec!["/orders", "/orders/7"]);

        app.trace_filter = TraceFilter::All;
        app.filter_push('p');
        app.filter_push('o');
        app.filter_push('s');
        let visible = app.visible_traces();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].response.status, Some(400));

        app.clear_filter();
        app.trace_filter = TraceFilter::Class(StatusClass::Other);
        assert_eq!(app.visible_traces()[0].request.uri, "/boom");
    }

    #[test]
    fn test_navigation_clamps_to_visible_traces() {
        let (_tx, mut app) = app_with_traces();

        // Overview ignores list navigation
        app.select_next();
        assert_eq!(app.selected_trace_index, 0);

        app.set_view(View::Traces);
        app.select_next_n(10);
        assert_eq!(app.selected_trace_index, 4);
        app.select_prev_n(2);
        assert_eq!(app.selected_trace_index, 2);
        app.select_first();
        assert_eq!(app.selected_trace_index, 0);
        app.select_last();
        assert_eq!(app.selected_trace_index, 4);

        // Switching bucket resets the cursor
        app.cycle_bucket();
        assert_eq!(app.selected_trace_index, 0);
    }

    #[test]
    fn test_selection_clamped_when_traces_shrink() {
        let (tx, mut app) = app_with_traces();
        app.set_view(View::Traces);
        app.select_last();

        tx.try_send(Update::Traces(vec![trace("GET", "/only", 200)])).unwrap();
        app.reload_data();
        assert_eq!(app.selected_trace_index, 0);
    }

    #[test]
    fn test_enter_detail_selects_trace() {
        let (_tx, mut app) = app_with_traces();

        // Nothing to select on the overview
        app.enter_detail();
        assert!(!app.show_detail_overlay);

        app.set_view(View::Traces);
        app.select_next_n(2);
        app.enter_detail();
        assert!(app.show_detail_overlay);
        assert_eq!(app.selected_trace.as_ref().unwrap().request.uri, "/missing");

        app.go_back();
        assert!(!app.show_detail_overlay);
        assert_eq!(app.current_view, View::Traces);
        app.go_back();
        assert_eq!(app.current_view, View::Overview);
    }

    #[test]
    fn test_enter_detail_with_no_traces() {
        let (_tx, source) = ChannelSource::create("empty");
        let mut app = App::new(Box::new(source), Theme::dark());
        app.set_view(View::Traces);
        app.enter_detail();
        assert!(!app.show_detail_overlay);
        assert!(app.selected_trace.is_none());
    }

    #[test]
    fn test_source_error_is_surfaced() {
        let (tx, source) = ChannelSource::create("gone");
        let mut app = App::new(Box::new(source), Theme::dark());
        drop(tx);
        app.reload_data();
        // The close is noticed on the poll, and reported on the next reload
        app.reload_data();
        assert_eq!(app.load_error.as_deref(), Some("Channel closed"));
    }

    #[test]
    fn test_export_writes_file_and_status() {
        let (_tx, app) = app_with_traces();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let mut app = app.with_export_path(&path);

        app.export();
        assert!(app.get_status_message().unwrap().starts_with("Exported to"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["total_traces"], 5);
        assert_eq!(json["buckets"]["200"], 2);
        assert_eq!(json["buckets"]["Other"], 1);
    }

    #[test]
    fn test_status_message_expires() {
        let (_tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Theme::dark());
        app.status_message = Some(("old".to_string(), Instant::now() - Duration::from_secs(5)));
        assert!(app.get_status_message().is_none());
        app.set_status_message("fresh".to_string());
        assert_eq!(app.get_status_message(), Some("fresh"));
    }
}
