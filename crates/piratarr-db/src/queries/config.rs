//! Key/value settings store.

use chrono::Utc;
use piratarr_common::{Error, Result};
use rusqlite::{Connection, OptionalExtension};

/// Read a setting, falling back to `default` when it was never written.
pub fn get_config(conn: &Connection, key: &str, default: &str) -> Result<String> {
    let value: Option<String> = conn
        .query_row("SELECT value FROM config WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(value.unwrap_or_else(|| default.to_string()))
}

/// Whether a setting has ever been written.
pub fn has_config(conn: &Connection, key: &str) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM config WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Create or overwrite a setting.
pub fn set_config(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO config (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        rusqlite::params![key, value, Utc::now().to_rfc3339()],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// All settings, sorted by key.
pub fn list_config(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn
        .prepare("SELECT key, value FROM config ORDER BY key")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn default_until_written_then_overwritten() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        assert_eq!(get_config(&conn, "scan_interval", "3600").unwrap(), "3600");
        assert!(!has_config(&conn, "scan_interval").unwrap());

        set_config(&conn, "scan_interval", "60").unwrap();
        assert_eq!(get_config(&conn, "scan_interval", "3600").unwrap(), "60");
        assert!(has_config(&conn, "scan_interval").unwrap());

        set_config(&conn, "scan_interval", "120").unwrap();
        assert_eq!(get_config(&conn, "scan_interval", "3600").unwrap(), "120");
    }

    #[test]
    fn empty_value_is_not_default() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        set_config(&conn, "radarr_url", "").unwrap();
        assert_eq!(get_config(&conn, "radarr_url", "fallback").unwrap(), "");
    }

    #[test]
    fn list_is_sorted() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        set_config(&conn, "b", "2").unwrap();
        set_config(&conn, "a", "1").unwrap();
        assert_eq!(
            list_config(&conn).unwrap(),
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
        );
    }
}
