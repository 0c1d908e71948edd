//! Backend client trait, HTTP implementation, and structured error types.
//!
//! `DashboardApi` abstracts the two calls the dashboard makes so the UI
//! worker can run against the real service or an in-memory fake in tests.

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use thiserror::Error;

use crate::config::DashboardConfig;
use crate::document::BacktestDocument;
use crate::request::BacktestRequest;

/// Errors from a backend call.
///
/// `Display` is the exact text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout, broken body stream.
    #[error("{0}")]
    Transport(String),

    /// Any non-2xx status. The body is not inspected.
    #[error("Request failed")]
    RequestFailed { status: u16 },

    /// The body was not the JSON we expected.
    #[error("{0}")]
    MalformedResponse(String),
}

impl ApiError {
    /// HTTP status for server-signalled failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status } => Some(*status),
            _ => None,
        }
    }

    fn transport(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Body of `GET /health`. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
}

/// The two backend operations the dashboard performs.
pub trait DashboardApi: Send + Sync {
    /// Read the service health status.
    fn health(&self) -> Result<HealthReport, ApiError>;

    /// Submit a backtest and return its raw result.
    fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestDocument, ApiError>;
}

/// Blocking HTTP client for the MarketSage service.
pub struct HttpApiClient {
    client: Client,
    config: DashboardConfig,
}

impl HttpApiClient {
    pub fn new(config: DashboardConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("marketsage/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::transport)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Reject non-2xx, then read the whole body.
    fn success_body(resp: Response) -> Result<Vec<u8>, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            log::debug!("http.status url={} status={}", resp.url(), status);
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
            });
        }
        resp.bytes()
            .map(|b| b.to_vec())
            .map_err(ApiError::transport)
    }
}

impl DashboardApi for HttpApiClient {
    fn health(&self) -> Result<HealthReport, ApiError> {
        let resp = self
            .client
            .get(self.config.health_url())
            .send()
            .map_err(ApiError::transport)?;
        let body = Self::success_body(resp)?;
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestDocument, ApiError> {
        let resp = self
            .client
            .post(self.config.backtest_url())
            .json(request)
            .send()
            .map_err(ApiError::transport)?;
        let body = Self::success_body(resp)?;
        BacktestDocument::from_slice(&body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}
