//! `camdeck` — terminal dashboard for a fleet of camera devices.
//!
//! Polls a device registry, reconciles the device list into a card pane,
//! and lets the operator inspect captures and AI analyses and edit
//! per-device configuration.
//!
//! Logs go to a file (never stdout — that would corrupt the terminal UI).
//! Entry point: CLI parsing, config resolution, tracing setup, panic
//! hooks, and app launch.

mod action;
mod app;
mod event;
mod form_view;
mod pane;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use camdeck_api::RegistryClient;

use crate::app::App;

/// Terminal dashboard for a camera-device registry.
#[derive(Parser, Debug)]
#[command(name = "camdeck", version, about)]
struct Cli {
    /// Registry base URL (e.g., http://192.168.1.10:8000)
    #[arg(short = 'u', long, env = "CAMDECK_REGISTRY")]
    registry: Option<String>,

    /// Seconds between automatic refreshes
    #[arg(long, env = "CAMDECK_REFRESH_INTERVAL_SECS")]
    refresh: Option<u64>,

    /// Log file path (defaults to the config-dir camdeck.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Returns a guard that must be held for the
/// lifetime of the application so logs are flushed on exit.
fn setup_tracing(log_path: &std::path::Path, verbose: u8) -> WorkerGuard {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "camdeck={log_level},camdeck_core={log_level},camdeck_api={log_level}"
        ))
    });

    let log_dir = log_path.parent().unwrap_or(std::path::Path::new("."));
    let log_filename = log_path
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("camdeck.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // CLI flags win over the config file, which wins over defaults.
    let config = camdeck_config::load_config_or_default();
    let registry = cli.registry.clone().unwrap_or_else(|| config.registry.clone());
    let refresh = cli
        .refresh
        .map_or_else(|| config.refresh_interval(), Duration::from_secs);
    let log_path = cli.log_file.clone().unwrap_or_else(|| config.log_path());

    let _log_guard = setup_tracing(&log_path, cli.verbose);
    info!(registry = %registry, "starting camdeck");

    let base_url = registry
        .parse()
        .map_err(|e| eyre!("invalid registry URL '{registry}': {e}"))?;
    let client = RegistryClient::new(base_url, config.timeout())
        .map_err(|e| eyre!("failed to build HTTP client: {e}"))?;

    let mut app = App::new(client, refresh);
    app.run().await?;

    Ok(())
}
