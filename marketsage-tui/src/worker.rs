//! Background network tasks: the UI thread never blocks on HTTP.
//!
//! Two kinds of task report back over one `mpsc` channel:
//! - a one-shot health probe, spawned once at startup
//! - the backtest worker, a long-lived thread fed by `WorkerCommand`s
//!
//! Every `RunBacktest` command produces exactly one completion message, even
//! if the request handler unwinds.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use marketsage_core::{ApiError, BacktestDocument, BacktestRequest, DashboardApi, HealthReport};

/// Commands sent from the UI to the backtest worker.
#[derive(Debug)]
pub enum WorkerCommand {
    RunBacktest { request: BacktestRequest },
    Shutdown,
}

/// Messages sent from background tasks back to the UI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    Health(Result<HealthReport, ApiError>),
    BacktestFinished(Result<BacktestDocument, ApiError>),
    /// The request handler exited without reporting an outcome.
    BacktestAborted,
}

/// Spawn the one-shot health probe.
pub fn spawn_health_probe(api: Arc<dyn DashboardApi>, tx: Sender<WorkerResponse>) -> JoinHandle<()> {
    thread::Builder::new()
        .name("marketsage-health".into())
        .spawn(move || {
            let outcome = api.health();
            match &outcome {
                Ok(report) => log::info!("health.ok status={}", report.status),
                Err(e) => log::warn!("health.failed error={e}"),
            }
            // The UI may already be gone.
            let _ = tx.send(WorkerResponse::Health(outcome));
        })
        .expect("failed to spawn health probe thread")
}

/// Spawn the backtest worker thread.
pub fn spawn_worker(
    api: Arc<dyn DashboardApi>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("marketsage-worker".into())
        .spawn(move || {
            log::debug!("worker.start");
            worker_loop(api.as_ref(), rx, tx);
            log::debug!("worker.stop");
        })
        .expect("failed to spawn worker thread")
}

/// Ask the worker to stop and wait at most `grace` for it to exit.
///
/// A backtest request has no timeout by default, so a thread blocked on an
/// unresponsive server is left detached instead of joined. Returns `true`
/// if the thread exited within the grace period.
pub fn shutdown_worker(
    tx: &Sender<WorkerCommand>,
    handle: JoinHandle<()>,
    grace: Duration,
) -> bool {
    // The worker may already be gone.
    let _ = tx.send(WorkerCommand::Shutdown);
    let deadline = Instant::now() + grace;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            log::warn!("worker.detached grace_ms={}", grace.as_millis());
            return false;
        }
        thread::sleep(Duration::from_millis(10));
    }
    let _ = handle.join();
    true
}

fn worker_loop(api: &dyn DashboardApi, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::RunBacktest { request }) => handle_backtest(api, &request, &tx),
        }
    }
}

fn handle_backtest(api: &dyn DashboardApi, request: &BacktestRequest, tx: &Sender<WorkerResponse>) {
    let guard = CompletionGuard::new(tx);
    log::info!(
        "backtest.dispatch from={} to={} symbols={}",
        request.from_date,
        request.to_date,
        request.symbols.len()
    );

    let outcome = api.run_backtest(request);
    match &outcome {
        Ok(_) => log::info!("backtest.ok"),
        Err(e) => log::warn!("backtest.failed status={:?} error={e}", e.status()),
    }
    guard.complete(outcome);
}

/// Reports `BacktestAborted` on drop unless `complete` ran first.
struct CompletionGuard<'a> {
    tx: &'a Sender<WorkerResponse>,
    completed: bool,
}

impl<'a> CompletionGuard<'a> {
    fn new(tx: &'a Sender<WorkerResponse>) -> Self {
        Self { tx, completed: false }
    }

    fn complete(mut self, outcome: Result<BacktestDocument, ApiError>) {
        self.completed = true;
        let _ = self.tx.send(WorkerResponse::BacktestFinished(outcome));
    }
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            log::error!("backtest.aborted");
            let _ = self.tx.send(WorkerResponse::BacktestAborted);
        }
    }
}
