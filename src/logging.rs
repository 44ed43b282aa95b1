//! Logging setup for the batch runner.
//!
//! Two targets:
//! - stderr, filtered by `RUST_LOG` (default `warn`) so reports on stdout stay clean
//! - a daily rotating file under the platform data directory at `info`,
//!   keeping 10 files
//!
//! ```no_run
//! dell_orders::logging::init().expect("Failed to initialize logging");
//! tracing::info!("started");
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const APP_DIR: &str = "dell-orders";

pub fn log_dir_for(base: &Path) -> PathBuf {
    base.join(APP_DIR).join("logs")
}

/// Gets the log directory, creating it if needed.
///
/// - Windows: `%APPDATA%/dell-orders/logs`
/// - macOS: `~/Library/Application Support/dell-orders/logs`
/// - Linux: `~/.local/share/dell-orders/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = log_dir_for(&base_dir);

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns error if the log directory or the file appender cannot be created.
pub fn init() -> Result<()> {
    let log_dir = get_log_dir()?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix(APP_DIR)
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create file appender")?;

    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .context("Failed to create env filter")?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(file_appender)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Logging initialized, log directory: {:?}", log_dir);

    Ok(())
}
