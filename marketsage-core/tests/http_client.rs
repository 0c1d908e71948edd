//! HTTP client against an in-process backend.
//!
//! The backend is an axum router on an ephemeral port, driven by its own
//! tokio runtime on a separate thread so the blocking client can call it.

use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use marketsage_core::{ApiError, BacktestForm, DashboardApi, DashboardConfig, HttpApiClient};

/// One request body seen by the backtest route, with its content type.
type Seen = Arc<Mutex<Vec<(Option<String>, String)>>>;

#[derive(Clone)]
struct Backend {
    status: StatusCode,
    body: &'static str,
    seen: Seen,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn backtest(
    State(backend): State<Backend>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    backend.seen.lock().unwrap().push((content_type, body));
    (backend.status, backend.body.to_string())
}

struct MockServer {
    addr: SocketAddr,
    seen: Seen,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MockServer {
    fn start(status: StatusCode, body: &'static str) -> Self {
        let seen: Seen = Arc::default();
        let backend = Backend {
            status,
            body,
            seen: seen.clone(),
        };
        let router = Router::new()
            .route("/health", get(health))
            .route("/backtest", post(backtest))
            .with_state(backend);

        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let handle = thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                addr_tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, router)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .unwrap();
            });
        });

        Self {
            addr: addr_rx.recv().unwrap(),
            seen,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    fn client(&self) -> HttpApiClient {
        let config = DashboardConfig::default()
            .with_base_url(format!("http://{}", self.addr))
            .unwrap();
        HttpApiClient::new(config).unwrap()
    }

    fn seen(&self) -> Vec<(Option<String>, String)> {
        self.seen.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[test]
fn health_reports_status_field() {
    let server = MockServer::start(StatusCode::OK, "{}");
    let report = server.client().health().unwrap();
    assert_eq!(report.status, "ok");
}

#[test]
fn backtest_success_returns_document() {
    let server = MockServer::start(StatusCode::OK, r#"{"pnl": 123}"#);
    let request = BacktestForm::new("2024-01-01", "", "AAPL, TSLA")
        .to_request()
        .unwrap();

    let doc = server.client().run_backtest(&request).unwrap();
    assert_eq!(doc.to_display_text(), "{\n  \"pnl\": 123\n}");

    let seen = server.seen();
    assert_eq!(seen.len(), 1);
    let (content_type, body) = &seen[0];
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(
        body,
        r#"{"from_date":"2024-01-01","to_date":"today","symbols":["AAPL","TSLA"]}"#
    );
}

#[test]
fn backtest_server_error_is_request_failed() {
    let server = MockServer::start(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail":"boom"}"#);
    let request = BacktestForm::new("2024-01-01", "", "AAPL, TSLA")
        .to_request()
        .unwrap();

    let err = server.client().run_backtest(&request).unwrap_err();
    assert_eq!(err, ApiError::RequestFailed { status: 500 });
    assert_eq!(err.to_string(), "Request failed");
}

#[test]
fn backtest_client_error_is_request_failed_too() {
    let server = MockServer::start(StatusCode::UNPROCESSABLE_ENTITY, "{}");
    let request = BacktestForm::new("2024-01-01", "", "SPY").to_request().unwrap();

    let err = server.client().run_backtest(&request).unwrap_err();
    assert_eq!(err.to_string(), "Request failed");
}

#[test]
fn backtest_invalid_json_is_malformed_response() {
    let server = MockServer::start(StatusCode::OK, "<html>oops</html>");
    let request = BacktestForm::new("2024-01-01", "", "SPY").to_request().unwrap();

    let err = server.client().run_backtest(&request).unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse(_)));
    assert!(!err.to_string().is_empty());
}

#[test]
fn unreachable_backend_is_transport_error() {
    // Bind then release a port so nothing is listening on it.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let config = DashboardConfig::default()
        .with_base_url(format!("http://{addr}"))
        .unwrap();
    let client = HttpApiClient::new(config).unwrap();

    assert!(matches!(client.health(), Err(ApiError::Transport(_))));
    let request = BacktestForm::new("2024-01-01", "", "SPY").to_request().unwrap();
    assert!(matches!(
        client.run_backtest(&request),
        Err(ApiError::Transport(_))
    ));
}
