// ABOUTME: Tracing subscriber setup - optional stdout plus a daily rolling log file
// ABOUTME: Also installs a panic hook that logs panics before the default hook runs

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "tux.log";

/// Default filter when `RUST_LOG` is unset
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "info,tux=debug,tux_core=debug,tux_loader=debug"
    } else {
        "info"
    }
}

/// Install the global subscriber. Keep the returned guard alive for the whole
/// process or buffered file output is lost.
///
/// With `stdout` off, logs go only to the file so that commands printing
/// their own output to stdout are not interleaved with log lines.
pub fn init(log_dir: &Path, debug: bool, stdout: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(debug)))
    };

    let file_appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = NonBlocking::new(file_appender);

    let stdout_layer = stdout.then(|| tracing_subscriber::fmt::layer().with_filter(filter()));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(file_writer)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    install_panic_hook();
    Ok(guard)
}

fn install_panic_hook() {
    let default_panic_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let payload = panic_info.payload();
        let payload = if let Some(s) = payload.downcast_ref::<&str>() {
            Some(*s)
        } else {
            payload.downcast_ref::<String>().map(String::as_str)
        };
        let location = panic_info.location().map(|l| l.to_string());

        tracing::error!(payload, location, "A panic occurred");

        default_panic_hook(panic_info);
    }));
}
