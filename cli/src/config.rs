//! stakerdb configuration with TOML file support.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use staker_store::PageLimits;
use staker_store_lmdb::LmdbConfig;
use staker_utils::LogFormat;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config is not serializable: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for inspecting a ledger.
///
/// Loaded from a TOML file via [`StakerDbConfig::from_toml_file`]; any field
/// left out takes its default, and command-line flags override the result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StakerDbConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub lmdb: LmdbConfig,

    /// Default and maximum page sizes for listings.
    #[serde(default)]
    pub paging: PageLimits,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "warn" or "info,staker_store_lmdb=debug".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./staker_data")
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl StakerDbConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for StakerDbConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            lmdb: LmdbConfig::default(),
            paging: PageLimits::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
