mod app;
mod events;
mod logging;
mod persist;
mod strings;
mod terminal;
mod theme;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use label_core::{HistoryStore, Printer, SettingsStore};
use providers::labelprinter::{HttpPrintClient, PrinterConfig};
use terminal::TerminalGuard;

fn main() -> Result<()> {
    let _log_guard = logging::init_logging().unwrap_or_else(|e| {
        eprintln!("Warning: logging disabled: {:#}", e);
        None
    });

    let cfg = PrinterConfig::from_env_and_file();
    let dir = cfg
        .prefs_dir
        .clone()
        .or_else(persist::prefs_dir)
        .context("no config directory available for preferences")?;
    let prefs = Arc::new(
        persist::FilePrefs::open(&dir, persist::DEFAULT_GROUP)
            .with_context(|| format!("open preferences in {}", dir.display()))?,
    );
    tracing::info!(target: "tui", "preferences at {}", prefs.path().display());
    let history = Arc::new(HistoryStore::open(prefs.clone()).context("load history")?);
    let printer = Printer::new(
        SettingsStore::new(prefs),
        history,
        HttpPrintClient::new(cfg),
    );

    let mut app = app::App::new(Arc::new(printer));
    let mut term = TerminalGuard::new()?;
    events::run(&mut term.terminal, &mut app)
}
