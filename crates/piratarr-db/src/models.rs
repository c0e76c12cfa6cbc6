//! Rust structs mapping to database rows.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`. Timestamps are stored and returned as RFC 3339 text.

use piratarr_common::{JobId, JobStatus, MediaId, MediaKind};
use rusqlite::types::Type;
use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;

fn parse_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    let uuid = Uuid::parse_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))?;
    Ok(T::from(uuid))
}

fn parse_enum<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = piratarr_common::Error>,
{
    let s: String = row.get(idx)?;
    s.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ---------------------------------------------------------------------------
// TranslationJob
// ---------------------------------------------------------------------------

/// One subtitle file's trip through the translator.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TranslationJob {
    pub id: JobId,
    pub media_title: String,
    pub media_kind: MediaKind,
    pub source_path: String,
    pub output_path: Option<String>,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub entry_count: i64,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl TranslationJob {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            media_title: row.get(1)?,
            media_kind: parse_enum(row, 2)?,
            source_path: row.get(3)?,
            output_path: row.get(4)?,
            status: parse_enum(row, 5)?,
            error_message: row.get(6)?,
            entry_count: row.get(7)?,
            created_at: row.get(8)?,
            completed_at: row.get(9)?,
        })
    }
}

/// Number of jobs in each state.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct JobCounts {
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
    pub failed: i64,
}

// ---------------------------------------------------------------------------
// MediaCacheEntry
// ---------------------------------------------------------------------------

/// Last known state of a movie or episode reported by Radarr/Sonarr.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MediaCacheEntry {
    pub id: MediaId,
    pub external_id: i64,
    pub media_kind: MediaKind,
    pub title: String,
    pub path: String,
    pub has_subtitle: bool,
    pub has_pirate_subtitle: bool,
    pub last_scanned: Option<String>,
}

impl MediaCacheEntry {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            external_id: row.get(1)?,
            media_kind: parse_enum(row, 2)?,
            title: row.get(3)?,
            path: row.get(4)?,
            has_subtitle: row.get(5)?,
            has_pirate_subtitle: row.get(6)?,
            last_scanned: row.get(7)?,
        })
    }
}

/// Media cache totals shown on the status page.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct MediaCounts {
    pub total: i64,
    pub with_subtitles: i64,
    pub with_pirate_subtitles: i64,
}
