mod clock;
mod config;
mod error;
mod indicator;
mod model;
mod notifier;
mod scheduler;
#[cfg(test)]
mod testing;
mod watchlist;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use derive_more::{Display, Error};
use error_stack::{Report, ResultExt};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clock::TokioClock;
use config::AppConfig;
use indicator::taapi::TaapiClient;
use notifier::telegram::TelegramNotifier;
use scheduler::Scheduler;
use watchlist::WatchList;

/// Upper bound on a single HTTP exchange with either provider.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Display, Error)]
pub enum AppError {
    #[display("configuration error")]
    Config,
    #[display("runtime error")]
    Runtime,
}

#[derive(Parser)]
#[command(
    name = "mfi-notifier",
    about = "Money flow index watcher with Telegram alerts"
)]
struct Cli {
    /// Dotenv file merged into the environment before reading configuration
    #[arg(short, long, default_value = ".env")]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(report) = run().await {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Report<AppError>> {
    let cli = Cli::parse();
    let config = config::load(&cli.env_file).change_context(AppError::Config)?;

    init_tracing(&config);

    let http = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .change_context(AppError::Runtime)
        .attach("failed to build HTTP client")?;

    let watch_list = Arc::new(WatchList::new(
        config.watch_list.clone(),
        Arc::new(TaapiClient::new(http.clone(), &config.taapi)),
        Arc::new(TelegramNotifier::new(http, &config.telegram)),
        Arc::new(TokioClock),
    ));

    info!(
        symbols = ?watch_list.symbols(),
        exchange = %config.taapi.exchange,
        interval = %config.taapi.interval,
        "starting mfi-notifier"
    );

    // ── Scheduler ─────────────────────────────────────────────────────────────
    let cancel = CancellationToken::new();
    let scheduler_handle = {
        let watch_list = Arc::clone(&watch_list);
        let cancel = cancel.clone();
        tokio::spawn(async move { Scheduler::default().run(&watch_list, cancel).await })
    };

    // ── Shutdown ──────────────────────────────────────────────────────────────
    shutdown_signal().await.change_context(AppError::Runtime)?;

    info!("Shutting down scheduler");
    cancel.cancel();

    // A cycle in progress is allowed to finish unless a second signal arrives.
    if !scheduler_handle.is_finished() {
        let max_wait = watchlist::REQUEST_SPACING * watch_list.symbols().len() as u32;
        info!(
            max_wait_secs = max_wait.as_secs(),
            "waiting for the running cycle to finish (up to {}s); signal again to exit now",
            max_wait.as_secs()
        );
    }

    finish_scheduler(scheduler_handle, shutdown_signal()).await?;

    info!("shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::new(&config.log_level);
    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}

/// Wait for the scheduler task to stop on its own, or abort it if `force`
/// resolves first. Returns `true` when the task finished by itself.
async fn finish_scheduler<F>(
    mut handle: JoinHandle<()>,
    force: F,
) -> Result<bool, Report<AppError>>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        joined = &mut handle => {
            joined.change_context(AppError::Runtime)?;
            Ok(true)
        }
        signal = force => {
            signal.change_context(AppError::Runtime)?;
            warn!("second shutdown signal, abandoning the running cycle");
            handle.abort();
            Ok(false)
        }
    }
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
