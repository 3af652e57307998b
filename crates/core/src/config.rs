//! Application configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "orderdesk";
/// File name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix of environment variable overrides (`ORDERDESK_LOG_DIR`, ...).
pub const ENV_PREFIX: &str = "ORDERDESK";

const DEFAULT_CONFIG: &str = r#"# orderdesk configuration
#
# Every key can be overridden with an ORDERDESK_<KEY> environment variable.

# Directory receiving orderdesk.log, relative to the working directory.
log_dir = "logs"

# Symbol printed in front of prices, e.g. "$" or "EUR ".
currency_symbol = ""

# Print each command before its outcome.
echo_commands = false

# How order history reports are printed: "text" or "json".
report_format = "text"
"#;

/// Output form of order history reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable blocks.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Runtime settings for the command runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory for the log file.
    pub log_dir: PathBuf,
    /// Prefix used when rendering prices.
    #[serde(default)]
    pub currency_symbol: String,
    /// Echo every command before its outcome.
    #[serde(default)]
    pub echo_commands: bool,
    /// Rendering of order history reports.
    #[serde(default)]
    pub report_format: ReportFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            currency_symbol: String::new(),
            echo_commands: false,
            report_format: ReportFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load from the default location, then environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (optional), then environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("log_dir", defaults.log_dir.to_string_lossy().to_string())?
            .set_default("currency_symbol", defaults.currency_symbol)?
            .set_default("echo_commands", defaults.echo_commands)?
            .set_default("report_format", "text")?
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse configuration {}", path.display()))
    }
}

/// Default configuration file location.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default configuration if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    ensure_default_config_at(config_path())
}

/// Write the commented default configuration to `path` if it is missing.
pub fn ensure_default_config_at(path: impl Into<PathBuf>) -> Result<PathBuf> {
    let path = path.into();
    if path.exists() {
        return Ok(path);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(path)
}
