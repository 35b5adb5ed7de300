//! Application configuration.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{draft::CommitMode, storage::FileStore};

/// Directory under the user's config directory holding `config.toml`.
pub const CONFIG_DIR: &str = "apexdraft";
/// Prefix for environment overrides, e.g. `APEXDRAFT_SESSION_KEY`.
pub const ENV_PREFIX: &str = "APEXDRAFT";

const DEFAULT_API_BASE_URL: &str = "https://api.openf1.org/v1";
const DEFAULT_SESSION_KEY: &str = "latest";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

const DEFAULT_CONFIG_TOML: &str = r#"# ApexDraft configuration

# Base URL of the OpenF1 API.
api_base_url = "https://api.openf1.org/v1"

# Session to read drivers, standings and laps from.
session_key = "latest"

# HTTP timeout in seconds.
request_timeout_secs = 15

# "immediate" writes the draft after every change, "deferred" on exit.
commit_mode = "immediate"

# Directory for the saved draft. Defaults to the platform data directory.
# storage_root = "/path/to/apexdraft"
"#;

/// Runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the catalog API.
    pub api_base_url: String,
    /// OpenF1 session identifier.
    pub session_key: String,
    /// Directory holding the saved draft.
    pub storage_root: PathBuf,
    /// HTTP timeout in seconds.
    pub request_timeout_secs: u64,
    /// When the draft is written to disk.
    pub commit_mode: CommitMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            storage_root: FileStore::default_root(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            commit_mode: CommitMode::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default config file plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (optional) plus environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = AppConfig::default();
        let settings = Config::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("session_key", defaults.session_key)?
            .set_default(
                "storage_root",
                defaults.storage_root.to_string_lossy().to_string(),
            )?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("commit_mode", "immediate")?
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("invalid configuration")?;
        Ok(config)
    }

    /// HTTP timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Location of the default config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write the default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
