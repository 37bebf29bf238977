//! `vulpini-tui` — live terminal dashboard for a vulpini proxy.
//!
//! Built on [ratatui](https://ratatui.rs), fed by the poll loop in
//! `vulpini-core`. Four tabs, navigable via number keys (1-4):
//! Dashboard, Config, IPs, and Logs.
//!
//! Logging goes to a file (only when one is configured) so the terminal
//! stays clean. A background bridge task maps poll results into the
//! action queue the UI drains.
//!
//! Entry point: CLI parsing, config layering, tracing setup, panic
//! hooks, and app launch.

mod action;
mod app;
mod bridge;
mod chart;
mod component;
mod dispatch;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vulpini_api::MonitorClient;
use vulpini_core::{MonitorConfig, config};

use crate::app::App;

/// Live monitor for a vulpini proxy's management API.
#[derive(Parser, Debug)]
#[command(name = "vulpini-tui", version, about)]
struct Cli {
    /// Management API base URL (e.g., http://localhost:9090)
    #[arg(short = 'u', long)]
    url: Option<String>,

    /// Delay between poll cycles, in milliseconds
    #[arg(short = 'i', long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Config file path (defaults to the platform config dir)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Append logs to this file (logging is off without it)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Start with the light palette
    #[arg(long)]
    light: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Layer CLI flags over the loaded config. Flags win.
    fn apply(&self, config: &mut MonitorConfig) {
        if let Some(url) = &self.url {
            config.url.clone_from(url);
        }
        if let Some(interval) = self.interval_ms {
            config.poll_interval_ms = interval;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
        if self.light {
            config.light_mode = true;
        }
    }
}

/// Set up file-based tracing. Nothing may go to stdout/stderr while the
/// terminal UI is active, so without a log file tracing stays disabled.
/// Returns a guard that must be held until exit so logs flush.
fn setup_tracing(config: &MonitorConfig, verbose: u8) -> Option<WorkerGuard> {
    let log_file = config.log_file.as_ref()?;

    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "vulpini_tui={log_level},vulpini_core={log_level},vulpini_api={log_level}"
        ))
    });

    let log_dir = log_file.parent().unwrap_or(std::path::Path::new("."));
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("vulpini-tui.log"));

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

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let mut config = config::load(cli.config.as_deref()).wrap_err("loading configuration")?;
    cli.apply(&mut config);
    config.validate().wrap_err("validating configuration")?;

    // Hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&config, cli.verbose);

    info!(
        url = %config.url,
        interval_ms = config.poll_interval_ms,
        "starting vulpini-tui"
    );

    let client = MonitorClient::new(config.base_url()?, config.request_timeout())
        .wrap_err("building API client")?;

    App::new(client, config).run().await?;

    Ok(())
}
