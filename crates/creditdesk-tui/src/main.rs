//! `creditdesk` — terminal console for customer credit-plan
//! administration.
//!
//! Lists customer accounts with their plan and credit balances, lets an
//! operator edit plan / per-user limit / top-up for the selected
//! customer, and persists those edits field-by-field through the
//! directory service, reporting the outcome as a toast.
//!
//! With no service URL configured the console runs against a built-in
//! in-memory demo directory, so it is usable with zero configuration.
//!
//! Logs are written to a file (default `/tmp/creditdesk.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod config;
mod data_bridge;
mod event;
mod panes;
mod theme;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use creditdesk_api::{DirectoryClient, TlsMode, TransportConfig};
use creditdesk_core::{CustomerDirectory, CustomerStore, InMemoryDirectory, Notifier};

use crate::app::App;

/// Terminal console for customer credit-plan administration.
#[derive(Parser, Debug)]
#[command(name = "creditdesk", version, about)]
struct Cli {
    /// Directory service URL (e.g., https://directory.internal).
    /// Omit to run against the built-in demo directory.
    #[arg(short = 'u', long)]
    url: Option<String>,

    /// Config file path (defaults to the platform config dir)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/creditdesk.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "creditdesk={log_level},creditdesk_core={log_level},creditdesk_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("creditdesk.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    guard
}

/// Resolve the directory backend: the HTTP client when a URL is
/// configured (CLI flag wins over config file), the seeded in-memory
/// demo directory otherwise.
fn build_directory(cli: &Cli, config: &config::Config) -> Result<Arc<dyn CustomerDirectory>> {
    let url = cli.url.clone().or_else(|| config.service_url.clone());

    let Some(url) = url else {
        info!("no service URL configured, using the demo directory");
        return Ok(Arc::new(InMemoryDirectory::seeded()));
    };

    let transport = TransportConfig {
        tls: if cli.insecure || config.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: Duration::from_secs(config.timeout_secs),
    };
    let parsed = url
        .parse()
        .wrap_err_with(|| format!("invalid service URL: {url}"))?;
    let client = DirectoryClient::new(parsed, &transport)
        .wrap_err("failed to build directory client")?;
    info!(%url, "using remote directory service");
    Ok(Arc::new(client))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let config = config::load_config(cli.config.as_deref())
        .wrap_err("failed to load configuration")?;

    info!("starting creditdesk");

    let directory = build_directory(&cli, &config)?;
    let notifier = Notifier::new(Duration::from_millis(config.toast_duration_ms));
    let store = CustomerStore::start(Arc::clone(&directory));

    let mut app = App::new(store, directory, notifier);
    app.run().await?;

    Ok(())
}
