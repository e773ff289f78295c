use anyhow::Context;
use directories::BaseDirs;
use serde::Deserialize;
use std::{env, fs, path::PathBuf, time::Duration};
use tracing::warn;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PrinterFileConfig {
    pub timeout_ms: Option<u64>,
    pub prefs_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct PrinterConfig {
    /// `None` leaves reqwest's defaults in place (no overall timeout).
    pub timeout: Option<Duration>,
    pub proxy: Option<String>,
    pub prefs_dir: Option<PathBuf>,
}

impl PrinterConfig {
    pub fn from_env_and_file() -> Self {
        let mut cfg = PrinterConfig::default();

        if let Some(path) = Self::config_path() {
            if path.exists() {
                let loaded = fs::read_to_string(&path)
                    .with_context(|| format!("read config file: {}", path.display()))
                    .and_then(|s| Self::parse_file(&s));
                match loaded {
                    Ok(file_cfg) => cfg.apply_file(file_cfg),
                    Err(e) => {
                        warn!(target: "providers::labelprinter", "ignoring config: {:#}", e)
                    }
                }
            }
        }

        if let Ok(dir) = env::var("LABELMAKER_PREFS_DIR") {
            if !dir.is_empty() {
                cfg.prefs_dir = Some(PathBuf::from(dir));
            }
        }

        cfg.proxy = env::var("HTTPS_PROXY")
            .ok()
            .or_else(|| env::var("HTTP_PROXY").ok())
            .filter(|p| !p.is_empty());

        cfg
    }

    pub fn parse_file(toml: &str) -> anyhow::Result<PrinterFileConfig> {
        toml::from_str::<PrinterFileConfig>(toml).context("parse config toml")
    }

    pub fn apply_file(&mut self, file_cfg: PrinterFileConfig) {
        if let Some(t) = file_cfg.timeout_ms {
            self.timeout = Some(Duration::from_millis(t));
        }
        if let Some(dir) = file_cfg.prefs_dir {
            self.prefs_dir = Some(dir);
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".labelmaker").join("config.toml")
        } else {
            base.config_dir().join("labelmaker").join("config.toml")
        };
        Some(p)
    }
}
