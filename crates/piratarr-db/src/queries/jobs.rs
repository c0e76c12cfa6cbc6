//! Translation job store.
//!
//! Every state change is a single `UPDATE ... WHERE status = <expected>`, so
//! an illegal transition simply affects no rows and returns `false`.

use chrono::{DateTime, Utc};
use piratarr_common::{Error, JobId, JobStatus, MediaKind, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::{JobCounts, TranslationJob};

const COLS: &str = "id, media_title, media_kind, source_path, output_path, status,
    error_message, entry_count, created_at, completed_at";

/// Default page size for [`list_jobs`].
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Create a job. Only `pending` (queued by a scan) and `processing`
/// (manual submission that bypasses the queue) are valid starting states.
pub fn create_job(
    conn: &Connection,
    media_title: &str,
    media_kind: MediaKind,
    source_path: &str,
    status: JobStatus,
    now: DateTime<Utc>,
) -> Result<TranslationJob> {
    if !status.is_active() {
        return Err(Error::validation(format!(
            "jobs cannot be created as {status}"
        )));
    }

    let id = JobId::new();
    let created_at = now.to_rfc3339();

    conn.execute(
        "INSERT INTO translation_jobs (id, media_title, media_kind, source_path, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            id.to_string(),
            media_title,
            media_kind.as_str(),
            source_path,
            status.as_str(),
            &created_at
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(TranslationJob {
        id,
        media_title: media_title.to_string(),
        media_kind,
        source_path: source_path.to_string(),
        output_path: None,
        status,
        error_message: None,
        entry_count: 0,
        created_at,
        completed_at: None,
    })
}

/// Get a job by ID.
pub fn get_job(conn: &Connection, id: JobId) -> Result<Option<TranslationJob>> {
    let q = format!("SELECT {COLS} FROM translation_jobs WHERE id = ?1");
    conn.query_row(&q, [id.to_string()], TranslationJob::from_row)
        .optional()
        .map_err(|e| Error::database(e.to_string()))
}

/// List jobs newest first, optionally filtered by status.
pub fn list_jobs(
    conn: &Connection,
    status: Option<JobStatus>,
    limit: i64,
) -> Result<Vec<TranslationJob>> {
    let (q, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status {
        Some(s) => (
            format!(
                "SELECT {COLS} FROM translation_jobs WHERE status = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2"
            ),
            vec![Box::new(s.as_str()), Box::new(limit)],
        ),
        None => (
            format!(
                "SELECT {COLS} FROM translation_jobs
                 ORDER BY created_at DESC, rowid DESC LIMIT ?1"
            ),
            vec![Box::new(limit)],
        ),
    };

    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|b| b.as_ref()).collect();
    let rows = stmt
        .query_map(params_refs.as_slice(), TranslationJob::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// All pending jobs, oldest first.
pub fn list_pending_jobs(conn: &Connection) -> Result<Vec<TranslationJob>> {
    let q = format!(
        "SELECT {COLS} FROM translation_jobs WHERE status = 'pending'
         ORDER BY created_at ASC, rowid ASC"
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], TranslationJob::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// The pending or processing job that owns `source_path`, if any.
pub fn find_active_job_for_source(
    conn: &Connection,
    source_path: &str,
) -> Result<Option<TranslationJob>> {
    let q = format!(
        "SELECT {COLS} FROM translation_jobs
         WHERE source_path = ?1 AND status IN ('pending', 'processing')
         ORDER BY created_at ASC LIMIT 1"
    );
    conn.query_row(&q, [source_path], TranslationJob::from_row)
        .optional()
        .map_err(|e| Error::database(e.to_string()))
}

/// `pending -> processing`.
pub fn start_job(conn: &Connection, id: JobId) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE translation_jobs SET status = 'processing'
             WHERE id = ?1 AND status = 'pending'",
            [id.to_string()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// `processing -> completed`. Records the output, the entry count and the
/// completion time, and clears any earlier error.
pub fn complete_job(
    conn: &Connection,
    id: JobId,
    output_path: &str,
    entry_count: i64,
    now: DateTime<Utc>,
) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE translation_jobs
             SET status = 'completed', output_path = ?1, entry_count = ?2,
                 completed_at = ?3, error_message = NULL
             WHERE id = ?4 AND status = 'processing'",
            rusqlite::params![output_path, entry_count, now.to_rfc3339(), id.to_string()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// `processing -> failed`. The output path is left untouched.
pub fn fail_job(conn: &Connection, id: JobId, error: &str) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE translation_jobs SET status = 'failed', error_message = ?1
             WHERE id = ?2 AND status = 'processing'",
            rusqlite::params![error, id.to_string()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// `failed -> pending`, clearing the error.
pub fn retry_job(conn: &Connection, id: JobId) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE translation_jobs SET status = 'pending', error_message = NULL, completed_at = NULL
             WHERE id = ?1 AND status = 'failed'",
            [id.to_string()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Return jobs stranded in `processing` by a previous run to `pending`.
pub fn reset_orphaned_jobs(conn: &Connection) -> Result<usize> {
    conn.execute(
        "UPDATE translation_jobs SET status = 'pending' WHERE status = 'processing'",
        [],
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Count jobs per status.
pub fn count_by_status(conn: &Connection) -> Result<JobCounts> {
    let mut stmt = conn
        .prepare("SELECT status, COUNT(*) FROM translation_jobs GROUP BY status")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
        .map_err(|e| Error::database(e.to_string()))?;

    let mut counts = JobCounts::default();
    for row in rows {
        let (status, n) = row.map_err(|e| Error::database(e.to_string()))?;
        match status.parse::<JobStatus>() {
            Ok(JobStatus::Pending) => counts.pending = n,
            Ok(JobStatus::Processing) => counts.processing = n,
            Ok(JobStatus::Completed) => counts.completed = n,
            Ok(JobStatus::Failed) => counts.failed = n,
            Err(_) => tracing::warn!(status = %status, "Ignoring unknown job status"),
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn pending(conn: &Connection, path: &str, secs: i64) -> TranslationJob {
        create_job(conn, "Alien (1979)", MediaKind::Movie, path, JobStatus::Pending, at(secs))
            .unwrap()
    }

    #[test]
    fn create_and_get() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let job = pending(&conn, "/m/a.srt", 0);
        assert_eq!(job.status, JobStatus::Pending);

        let found = get_job(&conn, job.id).unwrap().unwrap();
        assert_eq!(found, job);
        assert!(get_job(&conn, JobId::new()).unwrap().is_none());
    }

    #[test]
    fn terminal_states_cannot_be_created() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        for status in [JobStatus::Completed, JobStatus::Failed] {
            let err = create_job(&conn, "t", MediaKind::Manual, "/x.srt", status, at(0));
            assert!(matches!(err, Err(Error::Validation(_))));
        }
    }

    #[test]
    fn list_is_newest_first_with_filter() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let old = pending(&conn, "/m/a.srt", 0);
        let new = pending(&conn, "/m/b.srt", 10);
        assert!(start_job(&conn, new.id).unwrap());

        let all = list_jobs(&conn, None, DEFAULT_LIST_LIMIT).unwrap();
        assert_eq!(all.iter().map(|j| j.id).collect::<Vec<_>>(), vec![new.id, old.id]);

        let only_pending = list_jobs(&conn, Some(JobStatus::Pending), 100).unwrap();
        assert_eq!(only_pending.len(), 1);
        assert_eq!(only_pending[0].id, old.id);

        assert_eq!(list_jobs(&conn, None, 1).unwrap().len(), 1);
    }

    #[test]
    fn pending_queue_is_oldest_first() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let b = pending(&conn, "/m/b.srt", 5);
        let a = pending(&conn, "/m/a.srt", 1);
        let queue = list_pending_jobs(&conn).unwrap();
        assert_eq!(queue.iter().map(|j| j.id).collect::<Vec<_>>(), vec![a.id, b.id]);
    }

    #[test]
    fn full_lifecycle() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let job = pending(&conn, "/m/a.srt", 0);

        assert!(!complete_job(&conn, job.id, "/m/a.pirate.srt", 3, at(1)).unwrap());
        assert!(start_job(&conn, job.id).unwrap());
        assert!(!start_job(&conn, job.id).unwrap());
        assert!(fail_job(&conn, job.id, "disk full").unwrap());

        let failed = get_job(&conn, job.id).unwrap().unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.error_message.as_deref(), Some("disk full"));

        assert!(retry_job(&conn, job.id).unwrap());
        assert!(!retry_job(&conn, job.id).unwrap());
        let retried = get_job(&conn, job.id).unwrap().unwrap();
        assert_eq!(retried.status, JobStatus::Pending);
        assert!(retried.error_message.is_none());

        assert!(start_job(&conn, job.id).unwrap());
        assert!(complete_job(&conn, job.id, "/m/a.pirate.srt", 3, at(2)).unwrap());
        let done = get_job(&conn, job.id).unwrap().unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.output_path.as_deref(), Some("/m/a.pirate.srt"));
        assert_eq!(done.entry_count, 3);
        assert_eq!(done.completed_at, Some(at(2).to_rfc3339()));

        assert!(!fail_job(&conn, job.id, "late").unwrap());
        assert!(!retry_job(&conn, job.id).unwrap());
    }

    #[test]
    fn active_job_lookup() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        assert!(find_active_job_for_source(&conn, "/m/a.srt").unwrap().is_none());

        let job = pending(&conn, "/m/a.srt", 0);
        assert_eq!(
            find_active_job_for_source(&conn, "/m/a.srt").unwrap().map(|j| j.id),
            Some(job.id)
        );

        start_job(&conn, job.id).unwrap();
        assert!(find_active_job_for_source(&conn, "/m/a.srt").unwrap().is_some());

        fail_job(&conn, job.id, "boom").unwrap();
        assert!(find_active_job_for_source(&conn, "/m/a.srt").unwrap().is_none());
    }

    #[test]
    fn counts_and_orphan_reset() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let a = pending(&conn, "/m/a.srt", 0);
        let b = pending(&conn, "/m/b.srt", 1);
        pending(&conn, "/m/c.srt", 2);
        start_job(&conn, a.id).unwrap();
        start_job(&conn, b.id).unwrap();
        fail_job(&conn, b.id, "x").unwrap();

        let counts = count_by_status(&conn).unwrap();
        assert_eq!(
            counts,
            JobCounts { pending: 1, processing: 1, completed: 0, failed: 1 }
        );

        assert_eq!(reset_orphaned_jobs(&conn).unwrap(), 1);
        assert_eq!(count_by_status(&conn).unwrap().pending, 2);
    }
}
