//! Media cache operations.
//!
//! Rows are keyed by `(external_id, media_kind)` and never deleted by a scan.

use chrono::{DateTime, Utc};
use piratarr_common::{Error, MediaId, MediaKind, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::{MediaCacheEntry, MediaCounts};

const COLS: &str = "id, external_id, media_kind, title, path, has_subtitle,
    has_pirate_subtitle, last_scanned";

/// Insert or refresh the cache row for one media item.
///
/// Title, path, subtitle flag and scan time are overwritten on every scan.
/// The pirate flag is only ever raised here, never cleared.
pub fn upsert_media(
    conn: &Connection,
    external_id: i64,
    media_kind: MediaKind,
    title: &str,
    path: &str,
    has_subtitle: bool,
    now: DateTime<Utc>,
) -> Result<MediaCacheEntry> {
    let q = format!(
        "INSERT INTO media_cache (id, external_id, media_kind, title, path, has_subtitle, last_scanned)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (external_id, media_kind) DO UPDATE SET
             title = excluded.title,
             path = excluded.path,
             has_subtitle = excluded.has_subtitle,
             last_scanned = excluded.last_scanned
         RETURNING {COLS}"
    );
    conn.query_row(
        &q,
        rusqlite::params![
            MediaId::new().to_string(),
            external_id,
            media_kind.as_str(),
            title,
            path,
            has_subtitle,
            now.to_rfc3339()
        ],
        MediaCacheEntry::from_row,
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Get a cache row by ID.
pub fn get_media(conn: &Connection, id: MediaId) -> Result<Option<MediaCacheEntry>> {
    let q = format!("SELECT {COLS} FROM media_cache WHERE id = ?1");
    conn.query_row(&q, [id.to_string()], MediaCacheEntry::from_row)
        .optional()
        .map_err(|e| Error::database(e.to_string()))
}

/// List cached media ordered by title, optionally filtered by kind.
pub fn list_media(conn: &Connection, kind: Option<MediaKind>) -> Result<Vec<MediaCacheEntry>> {
    let (q, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match kind {
        Some(k) => (
            format!("SELECT {COLS} FROM media_cache WHERE media_kind = ?1 ORDER BY title"),
            vec![Box::new(k.as_str())],
        ),
        None => (format!("SELECT {COLS} FROM media_cache ORDER BY title"), vec![]),
    };

    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|b| b.as_ref()).collect();
    let rows = stmt
        .query_map(params_refs.as_slice(), MediaCacheEntry::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Flag that a pirate subtitle exists for this media.
pub fn set_pirate_subtitle(conn: &Connection, id: MediaId) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE media_cache SET has_pirate_subtitle = 1 WHERE id = ?1",
            [id.to_string()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Totals for the status overview.
pub fn count_media(conn: &Connection) -> Result<MediaCounts> {
    conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(has_subtitle), 0),
                COALESCE(SUM(has_pirate_subtitle), 0)
         FROM media_cache",
        [],
        |row| {
            Ok(MediaCounts {
                total: row.get(0)?,
                with_subtitles: row.get(1)?,
                with_pirate_subtitles: row.get(2)?,
            })
        },
    )
    .map_err(|e| Error::database(e.to_string()))
}
