//! Backtest request contract: form fields in, JSON body out.
//!
//! The three form fields are free text. Conversion applies the same rules as
//! the web form: from-date is required, an empty to-date becomes the `today`
//! sentinel, and symbols are split on commas with blanks dropped.

use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Literal sent in place of an omitted end date. The server resolves it.
pub const TODAY_SENTINEL: &str = "today";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reasons a form cannot be submitted. None of these reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("From Date is required")]
    MissingFromDate,

    #[error("Symbols are required")]
    MissingSymbols,

    #[error("{field} must be a YYYY-MM-DD date, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
}

/// End of the backtest window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToDate {
    Today,
    Date(NaiveDate),
}

impl fmt::Display for ToDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToDate::Today => f.write_str(TODAY_SENTINEL),
            ToDate::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
        }
    }
}

impl Serialize for ToDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Body of `POST /backtest`. Field order matches the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BacktestRequest {
    pub from_date: NaiveDate,
    pub to_date: ToDate,
    pub symbols: Vec<String>,
}

impl BacktestRequest {
    /// Compact JSON body as sent over the wire.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Raw text of the three form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BacktestForm {
    pub from_date: String,
    pub to_date: String,
    pub symbols: String,
}

impl BacktestForm {
    pub fn new(
        from_date: impl Into<String>,
        to_date: impl Into<String>,
        symbols: impl Into<String>,
    ) -> Self {
        Self {
            from_date: from_date.into(),
            to_date: to_date.into(),
            symbols: symbols.into(),
        }
    }

    /// Build a fresh request from the current field values.
    ///
    /// Whitespace-only symbol text passes the required check and yields an
    /// empty symbol list, which is still sent.
    pub fn to_request(&self) -> Result<BacktestRequest, FormError> {
        let from_raw = self.from_date.trim();
        if from_raw.is_empty() {
            return Err(FormError::MissingFromDate);
        }
        if self.symbols.is_empty() {
            return Err(FormError::MissingSymbols);
        }

        let from_date = parse_date("From Date", from_raw)?;
        let to_raw = self.to_date.trim();
        let to_date = if to_raw.is_empty() {
            ToDate::Today
        } else {
            ToDate::Date(parse_date("To Date", to_raw)?)
        };

        Ok(BacktestRequest {
            from_date,
            to_date,
            symbols: parse_symbols(&self.symbols),
        })
    }
}

/// Split comma-separated tickers, trim each, drop empties. Order and case are kept.
pub fn parse_symbols(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| FormError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn symbols_drop_blanks_and_whitespace() {
        assert_eq!(parse_symbols("AAPL, , msft ,"), vec!["AAPL", "msft"]);
    }

    #[test]
    fn symbols_keep_order_and_case() {
        assert_eq!(parse_symbols("tsla,AAPL,Msft"), vec!["tsla", "AAPL", "Msft"]);
    }

    #[test]
    fn symbols_from_blank_text_are_empty() {
        assert!(parse_symbols("").is_empty());
        assert!(parse_symbols(" , ,, ").is_empty());
    }

    #[test]
    fn empty_to_date_becomes_today() {
        let req = BacktestForm::new("2024-01-01", "", "SPY").to_request().unwrap();
        assert_eq!(req.to_date, ToDate::Today);
        let json: serde_json::Value = serde_json::from_str(&req.to_json().unwrap()).unwrap();
        assert_eq!(json["to_date"], "today");
    }

    #[test]
    fn explicit_to_date_is_sent_as_is() {
        let req = BacktestForm::new("2024-01-01", "2024-06-01", "SPY")
            .to_request()
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&req.to_json().unwrap()).unwrap();
        assert_eq!(json["to_date"], "2024-06-01");
    }

    #[test]
    fn wire_body_matches_contract() {
        let req = BacktestForm::new("2024-01-01", "", "AAPL, TSLA")
            .to_request()
            .unwrap();
        assert_eq!(
            req.to_json().unwrap(),
            r#"{"from_date":"2024-01-01","to_date":"today","symbols":["AAPL","TSLA"]}"#
        );
    }

    #[test]
    fn missing_from_date_blocks_submission() {
        let err = BacktestForm::new("", "", "SPY").to_request().unwrap_err();
        assert_eq!(err, FormError::MissingFromDate);
    }

    #[test]
    fn missing_symbols_blocks_submission() {
        let err = BacktestForm::new("2024-01-01", "", "").to_request().unwrap_err();
        assert_eq!(err, FormError::MissingSymbols);
    }

    #[test]
    fn whitespace_symbols_send_empty_list() {
        let req = BacktestForm::new("2024-01-01", "", " , ").to_request().unwrap();
        assert!(req.symbols.is_empty());
        assert!(req.to_json().unwrap().ends_with(r#""symbols":[]}"#));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let err = BacktestForm::new("01/02/2024", "", "SPY").to_request().unwrap_err();
        assert!(matches!(err, FormError::InvalidDate { field: "From Date", .. }));

        let err = BacktestForm::new("2024-01-01", "tomorrow", "SPY")
            .to_request()
            .unwrap_err();
        assert!(matches!(err, FormError::InvalidDate { field: "To Date", .. }));
    }

    #[test]
    fn to_date_display() {
        assert_eq!(ToDate::Today.to_string(), "today");
        let date = NaiveDate::from_ymd_opt(2023, 3, 9).unwrap();
        assert_eq!(ToDate::Date(date).to_string(), "2023-03-09");
    }

    proptest! {
        #[test]
        fn parsed_symbols_are_trimmed_and_non_empty(text in "[ A-Za-z,\\t]{0,40}") {
            for sym in parse_symbols(&text) {
                prop_assert!(!sym.is_empty());
                prop_assert_eq!(sym.trim(), sym.as_str());
                prop_assert!(!sym.contains(','));
            }
        }

        #[test]
        fn parsing_is_idempotent(text in "[ A-Za-z,]{0,40}") {
            let once = parse_symbols(&text);
            let twice = parse_symbols(&once.join(","));
            prop_assert_eq!(once, twice);
        }
    }
}
