//! Runs one translation: read the source subtitle, translate every cue and
//! write the pirate copy next to it.

use piratarr_common::{Clock, Error, JobStatus, Result};
use piratarr_db::models::TranslationJob;
use piratarr_db::pool::{get_conn, DbPool};
use piratarr_db::queries::jobs;
use piratarr_subtitle::{pirate_output_path, srt, translate_document, SubtitleError};
use std::path::{Path, PathBuf};

/// Outcome of a successful file translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedFile {
    pub output_path: PathBuf,
    pub entry_count: usize,
}

/// Translate `source` into `output`, or into the derived pirate path when no
/// output is given.
///
/// Blocking. Call from `spawn_blocking` inside async code.
pub fn translate_subtitle_file(
    source: &Path,
    output: Option<&Path>,
    seed: Option<u64>,
) -> std::result::Result<TranslatedFile, SubtitleError> {
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| pirate_output_path(source));

    let doc = srt::read_file(source)?;
    let translated = translate_document(&doc, seed);
    srt::write_file(&output_path, &translated)?;

    Ok(TranslatedFile {
        output_path,
        entry_count: translated.count(),
    })
}

/// Execute a job that is already `processing` and record the result.
///
/// Translation failures end up on the job as `failed`; only database errors
/// are returned. Returns the job as stored afterwards.
pub async fn run_job(pool: &DbPool, clock: &dyn Clock, job: &TranslationJob) -> Result<TranslationJob> {
    let job_id = job.id;
    let source = PathBuf::from(&job.source_path);
    tracing::info!(job_id = %job_id, path = %source.display(), "Translating subtitle");

    let outcome = tokio::task::spawn_blocking(move || translate_subtitle_file(&source, None, None))
        .await
        .map_err(|e| format!("translation task failed: {e}"))
        .and_then(|r| r.map_err(|e| e.to_string()));

    let conn = get_conn(pool)?;
    let recorded = match outcome {
        Ok(done) => {
            tracing::info!(
                job_id = %job_id,
                output = %done.output_path.display(),
                entries = done.entry_count,
                "Translation complete"
            );
            jobs::complete_job(
                &conn,
                job_id,
                &done.output_path.to_string_lossy(),
                done.entry_count as i64,
                clock.now(),
            )?
        }
        Err(message) => {
            tracing::error!(job_id = %job_id, "Translation failed: {}", message);
            jobs::fail_job(&conn, job_id, &message)?
        }
    };

    if !recorded {
        tracing::warn!(job_id = %job_id, "Job left processing before its result was recorded");
    }

    jobs::get_job(&conn, job_id)?.ok_or_else(|| Error::not_found("job", job_id))
}

/// Claim a pending job and run it. Returns `None` when another worker got
/// there first.
pub async fn claim_and_run(
    pool: &DbPool,
    clock: &dyn Clock,
    job: &TranslationJob,
) -> Result<Option<TranslationJob>> {
    debug_assert_eq!(job.status, JobStatus::Pending);
    let claimed = {
        let conn = get_conn(pool)?;
        jobs::start_job(&conn, job.id)?
    };
    if !claimed {
        return Ok(None);
    }
    run_job(pool, clock, job).await.map(Some)
}
