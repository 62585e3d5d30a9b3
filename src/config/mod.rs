use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "INVOICE_EDITOR_";

/// Configuration for the application
#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Directory printed invoices are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// File receiving log output; the terminal belongs to the UI
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("invoices")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("invoice_editor.log")
}

impl Config {
    /// Load configuration from `INVOICE_EDITOR_*` environment variables
    pub fn load() -> Result<Self> {
        let config = envy::prefixed(ENV_PREFIX).from_env::<Config>()?;
        Ok(config)
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

/// Load `.env` if present, then read the configuration
pub fn init() -> Result<Config> {
    dotenv().ok();
    Config::load()
}
