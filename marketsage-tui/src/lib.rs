//! MarketSage TUI: terminal dashboard for the backtesting service.
//!
//! Provides:
//! - Disclaimer banner and API health line
//! - Backtest form with inline validation
//! - Raw, scrollable result document
//! - Error history and help overlays

pub mod app;
pub mod input;
pub mod logging;
pub mod theme;
pub mod ui;
pub mod view_state;
pub mod worker;

pub use app::AppState;
pub use view_state::ViewState;
