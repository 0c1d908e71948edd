//! MarketSage CLI: headless access to the backtest service.
//!
//! Commands:
//! - `health`: print the service status; exits 1 when unreachable
//! - `backtest`: submit a run and print the result document verbatim
//! - `config`: print the resolved configuration as TOML

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use marketsage_core::{
    ApiError, BacktestForm, BacktestRequest, DashboardApi, DashboardConfig, HttpApiClient,
};

#[derive(Parser)]
#[command(
    name = "marketsage-cli",
    version,
    about = "MarketSage CLI: query the backtest service without the dashboard"
)]
struct Cli {
    /// Base URL of the backtest service.
    #[arg(long, global = true, env = "MARKETSAGE_BASE_URL")]
    base_url: Option<String>,

    /// Config file (defaults to <config_dir>/marketsage/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds. Without it requests wait indefinitely.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query GET /health and print the reported status.
    Health,
    /// Submit a backtest and print the result JSON.
    Backtest {
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        from: String,

        /// End date (YYYY-MM-DD). Defaults to "today".
        #[arg(long)]
        to: Option<String>,

        /// Comma-separated symbols, e.g. "AAPL, TSLA".
        #[arg(long)]
        symbols: String,
    },
    /// Print the resolved configuration.
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Config => {
            print!("{}", toml::to_string(&config).context("serialize config")?);
            Ok(())
        }
        Commands::Health => {
            let api = HttpApiClient::new(config).context("build HTTP client")?;
            match run_health(&api) {
                Ok(status) => {
                    println!("{status}");
                    Ok(())
                }
                Err(e) => {
                    log::warn!("health.failed error={e}");
                    eprintln!("unreachable: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Backtest { from, to, symbols } => {
            let request = build_request(&from, to.as_deref(), &symbols)?;
            let api = HttpApiClient::new(config).context("build HTTP client")?;
            match run_backtest(&api, &request) {
                Ok(text) => {
                    println!("{text}");
                    Ok(())
                }
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Config file first, then `--base-url` / env, then `--timeout-secs`.
fn resolve_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load(cli.config.as_deref()).context("load config")?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone()).context("--base-url")?;
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = Some(secs);
    }
    Ok(config)
}

/// Same rules as the dashboard form: an omitted `--to` means "today".
fn build_request(from: &str, to: Option<&str>, symbols: &str) -> Result<BacktestRequest> {
    let form = BacktestForm::new(from, to.unwrap_or_default(), symbols);
    Ok(form.to_request()?)
}

fn run_health(api: &dyn DashboardApi) -> Result<String, ApiError> {
    let report = api.health()?;
    log::info!("health.ok status={}", report.status);
    Ok(report.status)
}

fn run_backtest(api: &dyn DashboardApi, request: &BacktestRequest) -> Result<String, ApiError> {
    log::info!(
        "backtest.dispatch from={} to={} symbols={}",
        request.from_date,
        request.to_date,
        request.symbols.len()
    );
    let doc = api.run_backtest(request)?;
    Ok(doc.to_display_text())
}
