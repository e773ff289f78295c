//! File logging. The terminal belongs to the UI, so nothing is written to
//! stdout or stderr once the subscriber is installed.
//!
//! The filter comes from `RUST_LOG` and defaults to `info`.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Keep the returned guard alive for the
/// whole run or buffered lines are lost on exit.
pub fn init_logging() -> Result<Option<WorkerGuard>> {
    let Some(dir) = crate::persist::log_dir() else {
        return Ok(None);
    };
    fs::create_dir_all(&dir).with_context(|| format!("create log dir: {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, "labelmaker.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber")?;

    tracing::info!(target: "tui", "logging to {}", dir.display());
    Ok(Some(guard))
}
