mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./piratarr.toml",
        "~/.config/piratarr/config.toml",
        "/etc/piratarr/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Apply `PIRATARR_PORT` and `PIRATARR_CONFIG_DIR` on top of the file config.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PIRATARR_PORT") {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("Invalid PIRATARR_PORT: {port:?}"))?;
    }
    if let Some(dir) = lookup("PIRATARR_CONFIG_DIR") {
        config.storage.data_dir = PathBuf::from(shellexpand::tilde(&dir).as_ref());
    }
    validate_config(config)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.storage.data_dir.as_os_str().is_empty() {
        anyhow::bail!("Storage data_dir cannot be empty");
    }

    Ok(())
}

/// Fail early when the data directory is missing or read-only.
pub fn check_data_dir(dir: &Path) -> Result<()> {
    let meta = std::fs::metadata(dir)
        .with_context(|| format!("Data directory {:?} does not exist; create it first", dir))?;
    if !meta.is_dir() {
        anyhow::bail!("Data directory {:?} is not a directory", dir);
    }
    if meta.permissions().readonly() {
        anyhow::bail!("Data directory {:?} is not writable", dir);
    }
    Ok(())
}
