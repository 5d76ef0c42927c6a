//! Dashboard Session
//!
//! The state behind every view, as a plain state machine so both frontends
//! (CLI and web) drive the same transitions:
//!
//! ```text
//! Fetch:   begin_fetch() ──ticket──▶ api ──result──▶ complete_fetch(ticket, result)
//! Submit:  begin_submit() ──body──▶ api ──result──▶ complete_submit(result) ──▶ one refetch ticket
//! ```
//!
//! Every fetch carries a generation number. Only the result of the most
//! recently issued fetch is applied; anything older is dropped, so a slow
//! response can never overwrite newer data.

use serde_json::Value;

use crate::client::{BiofeedbackApi, ClientError};
use crate::model::{BiofeedbackEntry, DateRange};
use crate::series::ChartData;

pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch biofeedback data.";
pub const SUBMIT_ERROR_MESSAGE: &str =
    "Error submitting data. Please check your input and try again.";
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Data submitted successfully!";

/// Dashboard tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Trend,
    Latest,
    Summary,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Trend, Tab::Latest, Tab::Summary];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Trend => "Trend Chart",
            Tab::Latest => "Latest Entry",
            Tab::Summary => "Summary",
        }
    }
}

impl std::str::FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trend" | "trending" => Ok(Tab::Trend),
            "latest" => Ok(Tab::Latest),
            "summary" => Ok(Tab::Summary),
            other => Err(format!("Unknown view: {}. Use: trend, latest, summary", other)),
        }
    }
}

/// A user-visible message with its severity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(s) | Notice::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Handle for one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub range: DateRange,
}

/// What happened to a completed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Entries replaced
    Applied { count: usize },
    /// Latest fetch failed; entries untouched
    Failed,
    /// A newer fetch was issued; result dropped
    Stale,
}

/// An accepted submission, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitTicket {
    pub body: Value,
}

/// Why a submission never reached the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// Input did not parse as JSON
    InvalidJson,
    /// Another submission is still in flight
    InFlight,
}

/// What happened to a submission, end to end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(SubmitRejected),
    Failed,
    Submitted { refetch: FetchOutcome },
}

/// View state for one dashboard
#[derive(Debug, Clone, Default)]
pub struct Session {
    entries: Vec<BiofeedbackEntry>,
    range: DateRange,
    loading: bool,
    error: Option<String>,
    input: String,
    submitting: bool,
    notice: Option<Notice>,
    notices_shown: u64,
    issued: u64,
    tab: Tab,
    selected_metric: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[BiofeedbackEntry] {
        &self.entries
    }

    /// Chart data for the current entries (and metric selection)
    pub fn chart(&self) -> ChartData {
        let data = ChartData::from_entries(&self.entries);
        match &self.selected_metric {
            Some(metric) => data.focus(metric),
            None => data,
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last fetch failure, cleared by the next applied fetch
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Dismiss the current notice
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Bumped every time a notice is shown
    pub fn notice_generation(&self) -> u64 {
        self.notices_shown
    }

    /// Dismiss the notice only if no newer one has been shown since
    /// `generation` was read
    pub fn expire_notice(&mut self, generation: u64) {
        if generation == self.notices_shown {
            self.notice = None;
        }
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notices_shown += 1;
        self.notice = Some(notice);
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn selected_metric(&self) -> Option<&str> {
        self.selected_metric.as_deref()
    }

    /// Focus one metric; `None` shows all
    pub fn select_metric(&mut self, metric: Option<String>) {
        self.selected_metric = metric;
    }

    /// Change the date filter. Returns the fetch to issue for it.
    pub fn set_range(&mut self, range: DateRange) -> FetchTicket {
        self.range = range;
        self.begin_fetch()
    }

    /// Issue a fetch for the current range
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        tracing::debug!(generation = self.issued, "Fetch issued");

        FetchTicket {
            generation: self.issued,
            range: self.range,
        }
    }

    /// Apply a fetch result if it belongs to the latest issued fetch
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<BiofeedbackEntry>, ClientError>,
    ) -> FetchOutcome {
        if ticket.generation != self.issued {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.issued,
                "Dropping stale fetch result"
            );
            return FetchOutcome::Stale;
        }

        self.loading = false;

        match result {
            Ok(entries) => {
                let count = entries.len();
                self.entries = entries;
                self.error = None;
                tracing::info!(count, "Entries loaded");
                FetchOutcome::Applied { count }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch biofeedback data");
                self.error = Some(format!("{} ({})", FETCH_ERROR_MESSAGE, e));
                FetchOutcome::Failed
            }
        }
    }

    /// Validate the input and mark a submission in flight.
    ///
    /// Invalid JSON is rejected here, before anything touches the network.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitRejected> {
        if self.submitting {
            return Err(SubmitRejected::InFlight);
        }

        match serde_json::from_str::<Value>(&self.input) {
            Ok(body) => {
                self.submitting = true;
                self.notice = None;
                Ok(SubmitTicket { body })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Submission is not valid JSON");
                self.show_notice(Notice::Error(SUBMIT_ERROR_MESSAGE.to_string()));
                Err(SubmitRejected::InvalidJson)
            }
        }
    }

    /// Record the submission result. On success the input is cleared and
    /// the single follow-up fetch is issued.
    pub fn complete_submit(&mut self, result: Result<(), ClientError>) -> Option<FetchTicket> {
        self.submitting = false;

        match result {
            Ok(()) => {
                tracing::info!("Entry submitted");
                self.input.clear();
                self.error = None;
                self.show_notice(Notice::Success(SUBMIT_SUCCESS_MESSAGE.to_string()));
                Some(self.begin_fetch())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error submitting data");
                self.show_notice(Notice::Error(SUBMIT_ERROR_MESSAGE.to_string()));
                None
            }
        }
    }
}

/// Drives a [`Session`] through a [`BiofeedbackApi`]
pub struct Dashboard<A> {
    api: A,
    session: Session,
}

impl<A: BiofeedbackApi> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            session: Session::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Fetch the current range and apply it
    pub async fn refresh(&mut self) -> FetchOutcome {
        let ticket = self.session.begin_fetch();
        self.run_fetch(ticket).await
    }

    /// Change the range and fetch it
    pub async fn set_range(&mut self, range: DateRange) -> FetchOutcome {
        let ticket = self.session.set_range(range);
        self.run_fetch(ticket).await
    }

    /// Submit the current input; refetches once on success
    pub async fn submit(&mut self) -> SubmitOutcome {
        let ticket = match self.session.begin_submit() {
            Ok(ticket) => ticket,
            Err(rejected) => return SubmitOutcome::Rejected(rejected),
        };

        let result = self.api.submit_entry(&ticket.body).await;

        match self.session.complete_submit(result) {
            Some(fetch) => SubmitOutcome::Submitted {
                refetch: self.run_fetch(fetch).await,
            },
            None => SubmitOutcome::Failed,
        }
    }

    async fn run_fetch(&mut self, ticket: FetchTicket) -> FetchOutcome {
        let result = self.api.fetch_entries(&ticket.range).await;
        self.session.complete_fetch(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// In-memory API that records every call
    #[derive(Default)]
    struct FakeApi {
        entries: Mutex<Vec<BiofeedbackEntry>>,
        fetches: AtomicUsize,
        submits: AtomicUsize,
        fail_submit: bool,
        fail_fetch: bool,
        last_range: Mutex<Option<DateRange>>,
    }

    #[async_trait]
    impl BiofeedbackApi for FakeApi {
        async fn fetch_entries(
            &self,
            range: &DateRange,
        ) -> Result<Vec<BiofeedbackEntry>, ClientError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            *self.last_range.lock().unwrap() = Some(*range);
            if self.fail_fetch {
                return Err(ClientError::Transport("connection refused".into()));
            }
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| range.contains(e.date))
                .cloned()
                .collect())
        }

        async fn submit_entry(&self, entry: &Value) -> Result<(), ClientError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            if self.fail_submit {
                return Err(ClientError::from_status(500, "boom"));
            }
            let entry = BiofeedbackEntry::from_json(entry)
                .map_err(|e| ClientError::from_status(422, e.to_string()))?;
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_invalid_json_never_hits_network() {
        let mut dash = Dashboard::new(FakeApi::default());
        dash.session_mut().set_input("{not json");

        let outcome = dash.submit().await;

        assert_eq!(outcome, SubmitOutcome::Rejected(SubmitRejected::InvalidJson));
        assert_eq!(dash.api().submits.load(Ordering::SeqCst), 0);
        assert_eq!(dash.api().fetches.load(Ordering::SeqCst), 0);
        assert_eq!(
            dash.session().notice(),
            Some(&Notice::Error(SUBMIT_ERROR_MESSAGE.to_string()))
        );
        assert_eq!(dash.session().input(), "{not json");
        assert!(!dash.session().is_submitting());
    }

    #[tokio::test]
    async fn test_success_clears_input_and_refetches_once() {
        let mut dash = Dashboard::new(FakeApi::default());
        dash.session_mut()
            .set_input(r#"{"date": "2024-01-01", "time": "08:00", "metrics": {"mood": {"score": 4}}}"#);

        let outcome = dash.submit().await;

        assert_eq!(
            outcome,
            SubmitOutcome::Submitted {
                refetch: FetchOutcome::Applied { count: 1 }
            }
        );
        assert_eq!(dash.api().submits.load(Ordering::SeqCst), 1);
        assert_eq!(dash.api().fetches.load(Ordering::SeqCst), 1);
        assert_eq!(dash.session().input(), "");
        assert_eq!(dash.session().entries().len(), 1);
        assert_eq!(
            dash.session().notice().map(Notice::text),
            Some(SUBMIT_SUCCESS_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_server_rejection_keeps_input() {
        let api = FakeApi {
            fail_submit: true,
            ..Default::default()
        };
        let mut dash = Dashboard::new(api);
        dash.session_mut().set_input(r#"{"date": "2024-01-01"}"#);

        assert_eq!(dash.submit().await, SubmitOutcome::Failed);
        assert_eq!(dash.api().fetches.load(Ordering::SeqCst), 0);
        assert_eq!(dash.session().input(), r#"{"date": "2024-01-01"}"#);
        assert!(dash.session().notice().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_entries() {
        let mut dash = Dashboard::new(FakeApi::default());
        dash.api()
            .entries
            .lock()
            .unwrap()
            .push(BiofeedbackEntry::new(day("2024-01-01")).score("mood", 3.0));
        assert_eq!(dash.refresh().await, FetchOutcome::Applied { count: 1 });

        let failing = FakeApi {
            fail_fetch: true,
            ..Default::default()
        };
        let mut session = dash.session().clone();
        let ticket = session.begin_fetch();
        let result = failing.fetch_entries(&ticket.range).await;

        assert_eq!(session.complete_fetch(ticket, result), FetchOutcome::Failed);
        assert_eq!(session.entries().len(), 1);
        assert!(!session.is_loading());
        assert!(session.error().unwrap().starts_with(FETCH_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_range_is_sent_with_fetch() {
        let mut dash = Dashboard::new(FakeApi::default());
        let range = DateRange::new(Some(day("2024-01-01")), Some(day("2024-01-31"))).unwrap();

        dash.set_range(range).await;

        assert_eq!(*dash.api().last_range.lock().unwrap(), Some(range));
        assert_eq!(dash.session().range(), range);
    }

    #[test]
    fn test_stale_fetch_is_dropped() {
        let mut session = Session::new();
        let older = session.begin_fetch();
        let newer = session.begin_fetch();

        let newer_entries = vec![BiofeedbackEntry::new(day("2024-02-01")).score("mood", 5.0)];
        assert_eq!(
            session.complete_fetch(newer, Ok(newer_entries)),
            FetchOutcome::Applied { count: 1 }
        );
        assert!(!session.is_loading());

        let older_entries = vec![
            BiofeedbackEntry::new(day("2024-01-01")),
            BiofeedbackEntry::new(day("2024-01-02")),
        ];
        assert_eq!(
            session.complete_fetch(older, Ok(older_entries)),
            FetchOutcome::Stale
        );
        assert_eq!(session.entries().len(), 1);
        assert_eq!(session.entries()[0].date, day("2024-02-01"));
    }

    #[test]
    fn test_loading_stays_until_latest_completes() {
        let mut session = Session::new();
        let older = session.begin_fetch();
        let newer = session.begin_fetch();

        assert_eq!(session.complete_fetch(older, Ok(vec![])), FetchOutcome::Stale);
        assert!(session.is_loading());

        session.complete_fetch(newer, Ok(vec![]));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_double_submit_refused() {
        let mut session = Session::new();
        session.set_input("{}");

        assert!(session.begin_submit().is_ok());
        assert!(session.is_submitting());
        assert_eq!(session.begin_submit(), Err(SubmitRejected::InFlight));

        session.complete_submit(Err(ClientError::Timeout));
        assert!(!session.is_submitting());
        assert!(session.notice().unwrap().is_error());

        session.clear_notice();
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_selected_metric_narrows_chart() {
        let mut session = Session::new();
        let ticket = session.begin_fetch();
        session.complete_fetch(
            ticket,
            Ok(vec![BiofeedbackEntry::new(day("2024-01-01"))
                .score("mood", 3.0)
                .score("energy", 4.0)]),
        );

        assert_eq!(session.chart().series.len(), 2);

        // "mood" sorts after "energy", so it is not the first series
        let mood_color = session.chart().series_for("mood").unwrap().color;

        session.select_metric(Some("mood".to_string()));
        let chart = session.chart();
        assert_eq!(chart.metrics, vec!["mood"]);
        assert_eq!(chart.series[0].color, mood_color);

        session.select_metric(Some("unknown".to_string()));
        assert_eq!(session.chart().series.len(), 2);

        session.select_metric(None);
        assert_eq!(session.chart().series.len(), 2);
    }

    #[test]
    fn test_old_notice_timer_keeps_newer_notice() {
        let mut session = Session::new();
        session.set_input("{}");
        session.begin_submit().unwrap();
        session.complete_submit(Ok(()));
        let success = session.notice_generation();

        session.set_input("{broken");
        assert!(session.begin_submit().is_err());
        let error = session.notice_generation();

        session.expire_notice(success);
        assert_eq!(
            session.notice(),
            Some(&Notice::Error(SUBMIT_ERROR_MESSAGE.to_string()))
        );

        session.expire_notice(error);
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!("latest".parse::<Tab>().unwrap(), Tab::Latest);
        assert_eq!("Trend".parse::<Tab>().unwrap(), Tab::Trend);
        assert!("pie".parse::<Tab>().is_err());
        assert_eq!(Tab::Summary.label(), "Summary");
    }
}
