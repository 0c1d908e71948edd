//! Backtest view-state machine.
//!
//! ```text
//!   Idle ──submit──▶ Loading ──ok──▶ Loaded
//!                      │  ▲            │
//!                     err └──submit────┤
//!                      ▼               │
//!                    Error ──submit────┘ (back to Loading)
//! ```
//!
//! Exactly one variant holds at a time. Entering `Loading` drops any previous
//! error or document; leaving it always lands in `Loaded` or `Error`.

use marketsage_core::BacktestDocument;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Loaded(BacktestDocument),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn document(&self) -> Option<&BacktestDocument> {
        match self {
            ViewState::Loaded(doc) => Some(doc),
            _ => None,
        }
    }

    /// Enter `Loading`. Returns `false` and changes nothing if a request is
    /// already in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        *self = ViewState::Loading;
        true
    }

    /// Leave `Loading` with the request outcome. A completion that arrives
    /// when nothing is in flight is ignored and returns `false`.
    pub fn finish(&mut self, outcome: Result<BacktestDocument, String>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = match outcome {
            Ok(doc) => ViewState::Loaded(doc),
            Err(msg) => ViewState::Error(msg),
        };
        true
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Error(_) => "error",
            ViewState::Loaded(_) => "loaded",
        }
    }
}
