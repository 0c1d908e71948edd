//! MarketSage Core: everything the dashboard needs that is not UI.
//!
//! - Configuration (backend base URL, optional timeout)
//! - Backtest request construction from raw form text
//! - Opaque result document
//! - `DashboardApi` trait and its blocking HTTP implementation

pub mod client;
pub mod config;
pub mod document;
pub mod request;

pub use client::{ApiError, DashboardApi, HealthReport, HttpApiClient};
pub use config::{ConfigError, DashboardConfig, DEFAULT_BASE_URL};
pub use document::BacktestDocument;
pub use request::{parse_symbols, BacktestForm, BacktestRequest, FormError, ToDate, TODAY_SENTINEL};
