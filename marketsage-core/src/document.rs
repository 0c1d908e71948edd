//! Opaque backtest result.
//!
//! The backtest service returns arbitrary JSON. The dashboard never looks
//! inside it; it only renders it back as indented text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON payload displayed verbatim. Key order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BacktestDocument(Value);

impl BacktestDocument {
    /// Parse a response body.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes).map(Self)
    }

    /// Pretty-printed with two-space indentation.
    pub fn to_display_text(&self) -> String {
        format!("{:#}", self.0)
    }
}
