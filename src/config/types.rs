use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Process-level configuration read from `piratarr.toml`.
///
/// Connection settings for Radarr/Sonarr live in the database instead, so
/// they can be edited at runtime through the API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    6919
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/config")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("piratarr.db")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScannerConfig {
    /// Run the periodic background scan
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds to wait after startup before the first scan
    #[serde(default = "default_startup_delay")]
    pub startup_delay_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_startup_delay() -> u64 {
    5
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            startup_delay_secs: default_startup_delay(),
        }
    }
}
