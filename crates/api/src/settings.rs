//! Server configuration

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use water_store::{StoreConfig, QUALITY_FILE, USAGE_FILE};

use crate::DEFAULT_RECENT_LIMIT;

/// Dashboard server configuration
///
/// Layered from built-in defaults, an optional `water-dashboard.toml` in the
/// working directory, and `WATER_DASHBOARD_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Listen address
    pub bind_addr: String,
    /// Directory holding both CSV files
    pub data_dir: PathBuf,
    pub usage_file: String,
    pub quality_file: String,
    /// Rows in the recent-entries tables
    pub recent_limit: usize,
    /// Emit JSON log lines instead of plain text
    pub log_json: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8501".to_string(),
            data_dir: PathBuf::from("data"),
            usage_file: USAGE_FILE.to_string(),
            quality_file: QUALITY_FILE.to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            log_json: false,
        }
    }
}

impl DashboardConfig {
    /// Config file name, without extension
    pub const FILE_STEM: &'static str = "water-dashboard";
    /// Environment variable prefix
    pub const ENV_PREFIX: &'static str = "WATER_DASHBOARD";

    /// Load from the default file location and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::FILE_STEM)
    }

    /// Load from a specific file (optional) and the environment
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix(Self::ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// File locations for the store
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            usage_path: self.data_dir.join(&self.usage_file),
            quality_path: self.data_dir.join(&self.quality_file),
        }
    }
}
