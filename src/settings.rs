//! Runtime settings stored in the database config table.
//!
//! Unlike [`crate::config::Config`], these can be changed while the server
//! is running and are re-read at the start of every scan.

use piratarr_common::Result;
use piratarr_db::queries::config::{get_config, set_config};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer, Serialize};

pub const RADARR_URL: &str = "radarr_url";
pub const RADARR_API_KEY: &str = "radarr_api_key";
pub const SONARR_URL: &str = "sonarr_url";
pub const SONARR_API_KEY: &str = "sonarr_api_key";
pub const SCAN_INTERVAL: &str = "scan_interval";
pub const AUTO_TRANSLATE: &str = "auto_translate";
pub const PATH_MAPPINGS: &str = "path_mappings";

pub const DEFAULT_SCAN_INTERVAL: u64 = 3600;

/// Environment variables copied into the config table on first run.
const ENV_SEEDS: &[(&str, &str)] = &[
    ("RADARR_URL", RADARR_URL),
    ("RADARR_API_KEY", RADARR_API_KEY),
    ("SONARR_URL", SONARR_URL),
    ("SONARR_API_KEY", SONARR_API_KEY),
    ("SCAN_INTERVAL", SCAN_INTERVAL),
    ("AUTO_TRANSLATE", AUTO_TRANSLATE),
];

/// Rewrites a path prefix reported by Radarr/Sonarr into the local filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMapping {
    #[serde(default)]
    pub remote_path: String,
    #[serde(default)]
    pub local_path: String,
}

impl PathMapping {
    pub fn new(remote_path: impl Into<String>, local_path: impl Into<String>) -> Self {
        Self {
            remote_path: remote_path.into(),
            local_path: local_path.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.remote_path.is_empty() && !self.local_path.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub radarr_url: String,
    pub radarr_api_key: String,
    pub sonarr_url: String,
    pub sonarr_api_key: String,
    pub scan_interval: u64,
    pub auto_translate: bool,
    pub path_mappings: Vec<PathMapping>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            radarr_url: String::new(),
            radarr_api_key: String::new(),
            sonarr_url: String::new(),
            sonarr_api_key: String::new(),
            scan_interval: DEFAULT_SCAN_INTERVAL,
            auto_translate: true,
            path_mappings: Vec::new(),
        }
    }
}

impl Settings {
    /// Read all settings.
    ///
    /// An unparsable interval or mapping list falls back to its default. An
    /// unrecognised auto-translate value counts as off.
    pub fn load(conn: &Connection) -> Result<Self> {
        let scan_interval = get_config(conn, SCAN_INTERVAL, "")?
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_SCAN_INTERVAL);

        let auto_translate = parse_bool(&get_config(conn, AUTO_TRANSLATE, "true")?);

        let raw_mappings = get_config(conn, PATH_MAPPINGS, "[]")?;
        let path_mappings = serde_json::from_str::<Vec<PathMapping>>(&raw_mappings)
            .unwrap_or_else(|e| {
                tracing::warn!("Ignoring unparsable path mappings: {}", e);
                Vec::new()
            });

        Ok(Self {
            radarr_url: get_config(conn, RADARR_URL, "")?,
            radarr_api_key: get_config(conn, RADARR_API_KEY, "")?,
            sonarr_url: get_config(conn, SONARR_URL, "")?,
            sonarr_api_key: get_config(conn, SONARR_API_KEY, "")?,
            scan_interval,
            auto_translate,
            path_mappings,
        })
    }

    /// Write every setting back.
    pub fn save(&self, conn: &Connection) -> Result<()> {
        set_config(conn, RADARR_URL, &self.radarr_url)?;
        set_config(conn, RADARR_API_KEY, &self.radarr_api_key)?;
        set_config(conn, SONARR_URL, &self.sonarr_url)?;
        set_config(conn, SONARR_API_KEY, &self.sonarr_api_key)?;
        set_config(conn, SCAN_INTERVAL, &self.scan_interval.to_string())?;
        set_config(conn, AUTO_TRANSLATE, if self.auto_translate { "true" } else { "false" })?;
        save_path_mappings(conn, &self.path_mappings)
    }

    pub fn radarr_configured(&self) -> bool {
        !self.radarr_url.is_empty() && !self.radarr_api_key.is_empty()
    }

    pub fn sonarr_configured(&self) -> bool {
        !self.sonarr_url.is_empty() && !self.sonarr_api_key.is_empty()
    }
}

/// A partial settings change as posted by the settings page.
///
/// Absent fields are left untouched. Scalar values may arrive as strings,
/// numbers or booleans.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default, deserialize_with = "lenient_string")]
    pub radarr_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub radarr_api_key: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sonarr_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sonarr_api_key: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scan_interval: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub auto_translate: Option<String>,
    #[serde(default)]
    pub path_mappings: Option<Vec<PathMapping>>,
}

impl SettingsUpdate {
    pub fn apply(&self, conn: &Connection) -> Result<()> {
        let scalars = [
            (RADARR_URL, &self.radarr_url),
            (RADARR_API_KEY, &self.radarr_api_key),
            (SONARR_URL, &self.sonarr_url),
            (SONARR_API_KEY, &self.sonarr_api_key),
            (SCAN_INTERVAL, &self.scan_interval),
            (AUTO_TRANSLATE, &self.auto_translate),
        ];
        for (key, value) in scalars {
            if let Some(value) = value {
                set_config(conn, key, value)?;
            }
        }
        if let Some(mappings) = &self.path_mappings {
            save_path_mappings(conn, mappings)?;
        }
        Ok(())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn save_path_mappings(conn: &Connection, mappings: &[PathMapping]) -> Result<()> {
    let kept: Vec<&PathMapping> = mappings.iter().filter(|m| m.is_complete()).collect();
    let json = serde_json::to_string(&kept)
        .map_err(|e| piratarr_common::Error::internal(e.to_string()))?;
    set_config(conn, PATH_MAPPINGS, &json)
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Copy connection settings from the environment into the config table.
///
/// A key is only written while it is still unset or empty, so values saved
/// through the API survive restarts. Returns the number of keys written.
pub fn seed_from_env<F>(conn: &Connection, lookup: F) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut written = 0;
    for &(var, key) in ENV_SEEDS {
        let Some(value) = lookup(var).filter(|v| !v.is_empty()) else {
            continue;
        };
        if get_config(conn, key, "")?.is_empty() {
            set_config(conn, key, &value)?;
            tracing::info!(key = %key, "Seeded setting from {}", var);
            written += 1;
        }
    }
    Ok(written)
}

/// Show the first four characters of a key and star out the rest.
///
/// Keys of four characters or fewer are hidden completely.
pub fn mask_api_key(key: &str) -> String {
    let len = key.chars().count();
    if len <= 4 {
        return String::new();
    }
    let prefix: String = key.chars().take(4).collect();
    format!("{}{}", prefix, "*".repeat(len - 4))
}

/// Rewrite `path` using the mapping with the longest matching remote prefix.
///
/// A remote prefix matches the path itself or anything nested below it, so
/// `/tv` does not match `/tvshows/x.mkv`. Unmatched paths are returned as is.
pub fn apply_path_mapping(path: &str, mappings: &[PathMapping]) -> String {
    let best = mappings
        .iter()
        .filter(|m| m.is_complete())
        .map(|m| (m.remote_path.trim_end_matches('/'), m.local_path.trim_end_matches('/')))
        .filter(|(remote, _)| {
            path == *remote
                || path
                    .strip_prefix(remote)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|(remote, _)| remote.len());

    match best {
        Some((remote, local)) => {
            let mapped = format!("{}{}", local, &path[remote.len()..]);
            if mapped.is_empty() {
                "/".to_string()
            } else {
                mapped
            }
        }
        None => path.to_string(),
    }
}
