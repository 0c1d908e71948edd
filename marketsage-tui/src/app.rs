//! Application state: single-owner, main-thread only.
//!
//! All dashboard state lives here. Background tasks communicate via channels
//! and their replies are applied in `drain_worker`.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use chrono::NaiveDateTime;

use marketsage_core::{ApiError, BacktestForm, HealthReport};

use crate::ui::results_panel;
use crate::view_state::ViewState;
use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Which form control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    FromDate,
    ToDate,
    Symbols,
    Submit,
}

impl Focus {
    pub fn index(self) -> usize {
        match self {
            Focus::FromDate => 0,
            Focus::ToDate => 1,
            Focus::Symbols => 2,
            Focus::Submit => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Focus::FromDate),
            1 => Some(Focus::ToDate),
            2 => Some(Focus::Symbols),
            3 => Some(Focus::Submit),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::FromDate => "From Date",
            Focus::ToDate => "To Date",
            Focus::Symbols => "Symbols (comma separated)",
            Focus::Submit => "Run Backtest",
        }
    }

    pub fn next(self) -> Focus {
        Focus::from_index((self.index() + 1) % 4).unwrap_or(Focus::FromDate)
    }

    pub fn prev(self) -> Focus {
        Focus::from_index((self.index() + 3) % 4).unwrap_or(Focus::FromDate)
    }

    /// Date inputs only take digits and dashes.
    pub fn is_date(self) -> bool {
        matches!(self, Focus::FromDate | Focus::ToDate)
    }
}

/// Result of the startup health probe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HealthStatus {
    /// Probe still in flight.
    #[default]
    Pending,
    Reported(String),
    Unreachable(String),
}

impl HealthStatus {
    /// Text shown after "API health:".
    pub fn display(&self) -> &str {
        match self {
            HealthStatus::Pending => "...",
            HealthStatus::Reported(status) if status.is_empty() => "...",
            HealthStatus::Reported(status) => status,
            HealthStatus::Unreachable(_) => "unreachable",
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, HealthStatus::Pending)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Http,
    Response,
    Worker,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Http => "HTTP",
            ErrorCategory::Response => "JSON",
            ErrorCategory::Worker => "TASK",
        }
    }

    fn of(err: &ApiError) -> Self {
        match err {
            ApiError::Transport(_) => ErrorCategory::Network,
            ApiError::RequestFailed { .. } => ErrorCategory::Http,
            ApiError::MalformedResponse(_) => ErrorCategory::Response,
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,

    // Dashboard
    pub base_url: String,
    pub health: HealthStatus,
    pub form: BacktestForm,
    pub focus: Focus,
    pub view: ViewState,
    pub results_scroll: u16,
    /// Inner (width, height) of the results panel at the last draw.
    pub results_viewport: Cell<(u16, u16)>,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            running: true,
            base_url: base_url.into(),
            health: HealthStatus::Pending,
            form: BacktestForm::default(),
            focus: Focus::FromDate,
            view: ViewState::Idle,
            results_scroll: 0,
            results_viewport: Cell::new((0, 0)),
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
        }
    }

    /// Text buffer behind the focused control, if it is an input.
    pub fn focused_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::FromDate => Some(&mut self.form.from_date),
            Focus::ToDate => Some(&mut self.form.to_date),
            Focus::Symbols => Some(&mut self.form.symbols),
            Focus::Submit => None,
        }
    }

    pub fn field(&self, focus: Focus) -> &str {
        match focus {
            Focus::FromDate => &self.form.from_date,
            Focus::ToDate => &self.form.to_date,
            Focus::Symbols => &self.form.symbols,
            Focus::Submit => "",
        }
    }

    /// Submit the form.
    ///
    /// Ignored while a request is in flight. Required-field or date errors
    /// are reported as warnings and leave the view untouched. Otherwise the
    /// view enters `Loading` before the command is dispatched.
    pub fn submit(&mut self) {
        if self.view.is_loading() {
            self.set_warning("A backtest is already running");
            return;
        }

        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.set_warning(e.to_string());
                return;
            }
        };

        self.view.begin();
        self.results_scroll = 0;
        self.set_status(format!("Running backtest for {} symbol(s)...", request.symbols.len()));

        if self
            .worker_tx
            .send(WorkerCommand::RunBacktest { request })
            .is_err()
        {
            self.fail_in_flight("Backtest worker is not running");
        }
    }

    /// Apply every pending worker reply without blocking.
    ///
    /// If all senders are gone while a backtest is in flight, the view is
    /// moved to `Error` so `Loading` cannot outlive the worker.
    pub fn drain_worker(&mut self) {
        loop {
            match self.worker_rx.try_recv() {
                Ok(resp) => self.handle_worker_response(resp),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.view.is_loading() {
                        self.fail_in_flight("Backtest worker stopped");
                    }
                    break;
                }
            }
        }
    }

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Health(outcome) => self.apply_health(outcome),
            WorkerResponse::BacktestFinished(Ok(doc)) => {
                if self.view.finish(Ok(doc)) {
                    self.set_status("Backtest complete");
                }
            }
            WorkerResponse::BacktestFinished(Err(err)) => {
                let message = err.to_string();
                if self.view.finish(Err(message.clone())) {
                    let context = match err.status() {
                        Some(status) => format!("backtest (HTTP {status})"),
                        None => "backtest".to_string(),
                    };
                    self.push_error(ErrorCategory::of(&err), message, context);
                }
            }
            WorkerResponse::BacktestAborted => {
                self.fail_in_flight("Backtest task aborted");
            }
        }
    }

    fn apply_health(&mut self, outcome: Result<HealthReport, ApiError>) {
        match outcome {
            Ok(report) => self.health = HealthStatus::Reported(report.status),
            Err(err) => {
                let reason = err.to_string();
                self.health = HealthStatus::Unreachable(reason.clone());
                self.push_error(ErrorCategory::of(&err), reason, "health check".into());
            }
        }
    }

    fn fail_in_flight(&mut self, message: &str) {
        if self.view.finish(Err(message.to_string())) {
            self.push_error(ErrorCategory::Worker, message.to_string(), "backtest".into());
        }
    }

    /// Scroll the results panel, clamped so the last wrapped row can reach
    /// the bottom of the panel.
    pub fn scroll_results(&mut self, delta: i32) {
        let max = match self.view.document() {
            Some(doc) => {
                let text = doc.to_display_text();
                match self.results_viewport.get() {
                    // Not drawn yet: one row per line.
                    (0, _) => {
                        u16::try_from(text.lines().count().saturating_sub(1)).unwrap_or(u16::MAX)
                    }
                    (width, height) => results_panel::max_scroll(&text, width, height),
                }
            }
            None => 0,
        };
        let next = i64::from(self.results_scroll) + i64::from(delta);
        self.results_scroll = next.clamp(0, i64::from(max)) as u16;
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
