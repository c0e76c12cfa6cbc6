//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order.  A
//! `schema_migrations` table tracks which versions have been applied.

use piratarr_common::{Error, Result};
use rusqlite::Connection;

/// V1: config store, translation jobs, media cache.
const V1_INITIAL: &str = r#"
CREATE TABLE config (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE translation_jobs (
    id            TEXT PRIMARY KEY,
    media_title   TEXT NOT NULL,
    media_kind    TEXT NOT NULL,
    source_path   TEXT NOT NULL,
    output_path   TEXT,
    status        TEXT NOT NULL DEFAULT 'pending',
    error_message TEXT,
    entry_count   INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,
    completed_at  TEXT
);

CREATE INDEX idx_translation_jobs_status ON translation_jobs(status);
CREATE INDEX idx_translation_jobs_source ON translation_jobs(source_path, status);

CREATE TABLE media_cache (
    id                  TEXT PRIMARY KEY,
    external_id         INTEGER NOT NULL,
    media_kind          TEXT NOT NULL,
    title               TEXT NOT NULL,
    path                TEXT NOT NULL,
    has_subtitle        INTEGER NOT NULL DEFAULT 0,
    has_pirate_subtitle INTEGER NOT NULL DEFAULT 0,
    last_scanned        TEXT,
    UNIQUE (external_id, media_kind)
);

CREATE INDEX idx_media_cache_title ON media_cache(title);
"#;

/// All migrations in version order.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL)];

/// Run every migration that has not been applied yet.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::debug!(version, "Applied database migration");
    }

    Ok(())
}
