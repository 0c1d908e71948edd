//! MarketSage dashboard: single-page terminal front end for the backtest API.
//!
//! Startup:
//! 1. Resolve config (file, then `--base-url` / `MARKETSAGE_BASE_URL`)
//! 2. Probe `/health` once in the background
//! 3. Run the form/results event loop until Esc or Ctrl+C

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use marketsage_core::{DashboardApi, DashboardConfig, HttpApiClient};
use marketsage_tui::app::AppState;
use marketsage_tui::worker;
use marketsage_tui::{input, logging, ui};

/// How long to wait for the worker to finish an in-flight request on exit.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(name = "marketsage", version, about = "MarketSage-Pro backtest dashboard")]
struct Args {
    /// Base URL of the backtest service.
    #[arg(long, env = "MARKETSAGE_BASE_URL")]
    base_url: Option<String>,

    /// Config file (defaults to <config_dir>/marketsage/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (defaults to <cache_dir>/marketsage/dashboard.log).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init_file_logger(&log_path)?;

    let mut config = DashboardConfig::load(args.config.as_deref()).context("load config")?;
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url).context("--base-url")?;
    }
    log::info!(
        "dashboard.start base_url={} log={}",
        config.base_url,
        log_path.display()
    );

    let base_url = config.base_url.clone();
    let api: Arc<dyn DashboardApi> =
        Arc::new(HttpApiClient::new(config).context("build HTTP client")?);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels. Only background threads hold response senders, so
    // the app sees a disconnect if they all exit.
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    worker::spawn_health_probe(Arc::clone(&api), resp_tx.clone());
    let worker_handle = worker::spawn_worker(api, cmd_rx, resp_tx);

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, base_url);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Shutdown worker. One stuck on an unanswered request is left to die
    // with the process.
    let joined = worker::shutdown_worker(&cmd_tx, worker_handle, SHUTDOWN_GRACE);
    log::info!("dashboard.stop worker_joined={joined}");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Apply worker replies (non-blocking)
        app.drain_worker();

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
