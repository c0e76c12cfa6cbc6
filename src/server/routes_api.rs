use crate::server::{AppContext, AppError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use piratarr_common::{Error, JobId, JobStatus, MediaId, MediaKind};
use piratarr_db::pool::get_conn;
use piratarr_db::queries::{jobs, media};
use serde::Deserialize;
use serde_json::json;

/// Seed used by the preview endpoint so the same text always previews the same
const PREVIEW_SEED: u64 = 42;

/// Upper bound for `?limit=` on the job list
const MAX_JOB_LIMIT: i64 = 1000;

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/status", get(status))
        .route("/media", get(list_media))
        .route("/media/:id/translate", post(translate_media))
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id/retry", post(retry_job))
        .route("/translate", post(translate_file))
        .route("/translate/batch", post(translate_batch))
        .route("/scan", post(scan))
        .route("/preview", post(preview))
}

async fn status(State(ctx): State<AppContext>) -> Result<impl IntoResponse, AppError> {
    let conn = get_conn(&ctx.db)?;
    let media_counts = media::count_media(&conn)?;
    let job_counts = jobs::count_by_status(&conn)?;
    let scanner = ctx.scanner.status();

    Ok(Json(json!({
        "scanner_running": scanner.running,
        "is_scanning": scanner.scanning,
        "last_scan": scanner.last_scan.map(|t| t.to_rfc3339()),
        "media": media_counts,
        "jobs": job_counts,
    })))
}

#[derive(Deserialize)]
struct ListMediaQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

async fn list_media(
    State(ctx): State<AppContext>,
    Query(params): Query<ListMediaQuery>,
) -> Result<impl IntoResponse, AppError> {
    let kind = params
        .kind
        .filter(|k| !k.is_empty())
        .map(|k| k.parse::<MediaKind>())
        .transpose()?;

    let conn = get_conn(&ctx.db)?;
    Ok(Json(media::list_media(&conn, kind)?))
}

#[derive(Deserialize)]
struct ListJobsQuery {
    status: Option<String>,
    limit: Option<i64>,
}

async fn list_jobs(
    State(ctx): State<AppContext>,
    Query(params): Query<ListJobsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = params
        .status
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<JobStatus>())
        .transpose()?;
    let limit = params
        .limit
        .unwrap_or(jobs::DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_JOB_LIMIT);

    let conn = get_conn(&ctx.db)?;
    Ok(Json(jobs::list_jobs(&conn, status, limit)?))
}

async fn retry_job(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let job_id: JobId = id.parse().map_err(|_| Error::not_found("job", &id))?;

    let conn = get_conn(&ctx.db)?;
    let job = jobs::get_job(&conn, job_id)?.ok_or_else(|| Error::not_found("job", job_id))?;
    if job.status != JobStatus::Failed {
        return Err(Error::validation("Only failed jobs can be retried").into());
    }
    if !jobs::retry_job(&conn, job_id)? {
        return Err(Error::conflict("Job changed state before it could be retried").into());
    }
    let job = jobs::get_job(&conn, job_id)?.ok_or_else(|| Error::not_found("job", job_id))?;

    tracing::info!(job_id = %job_id, "Job queued for retry");
    Ok(Json(json!({ "message": "Job queued for retry", "job": job })))
}

#[derive(Deserialize)]
struct TranslateFileRequest {
    #[serde(default)]
    path: Option<String>,
}

async fn translate_file(
    State(ctx): State<AppContext>,
    Json(payload): Json<TranslateFileRequest>,
) -> Result<Response, AppError> {
    let path = payload
        .path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| Error::validation("Missing 'path' in request body"))?;

    let job = ctx.scanner.translate_file(std::path::Path::new(&path)).await?;

    if job.status == JobStatus::Failed {
        let reason = job.error_message.clone().unwrap_or_default();
        let body = json!({
            "error": format!("Translation failed: {reason}"),
            "code": "translation_failed",
            "job": job,
        });
        return Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response());
    }

    Ok(Json(json!({ "message": "Translation complete", "job": job })).into_response())
}

async fn translate_media(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let media_id: MediaId = id.parse().map_err(|_| Error::not_found("media", &id))?;

    let outcome = ctx.scanner.translate_media(&[media_id]).await?;
    if outcome.media_found == 0 {
        return Err(Error::not_found("media", media_id).into());
    }
    if outcome.subtitles_found == 0 {
        return Err(Error::not_found("subtitle files for media", media_id).into());
    }

    let message = if outcome.jobs_created > 0 {
        format!("Translated {} subtitle file(s)", outcome.jobs_created)
    } else {
        "Already translated".to_string()
    };
    Ok(Json(json!({ "message": message, "jobs_created": outcome.jobs_created })))
}

#[derive(Deserialize)]
struct TranslateBatchRequest {
    #[serde(default)]
    media_ids: Option<Vec<MediaId>>,
}

async fn translate_batch(
    State(ctx): State<AppContext>,
    Json(payload): Json<TranslateBatchRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ids = payload
        .media_ids
        .filter(|ids| !ids.is_empty())
        .ok_or_else(|| Error::validation("'media_ids' must be a non-empty list"))?;

    let outcome = ctx.scanner.translate_media(&ids).await?;

    let message = if outcome.jobs_created > 0 {
        format!("Translated {} subtitle file(s)", outcome.jobs_created)
    } else {
        "All already translated".to_string()
    };
    Ok(Json(json!({ "message": message, "jobs_created": outcome.jobs_created })))
}

async fn scan(State(ctx): State<AppContext>) -> Result<impl IntoResponse, AppError> {
    let summary = ctx.scanner.scan_now().await?;
    Ok(Json(json!({ "message": "Scan complete", "summary": summary })))
}

#[derive(Deserialize)]
struct PreviewRequest {
    #[serde(default)]
    text: Option<String>,
}

async fn preview(Json(payload): Json<PreviewRequest>) -> Result<impl IntoResponse, AppError> {
    let text = payload
        .text
        .ok_or_else(|| Error::validation("Missing 'text' in request body"))?;
    let translated = piratarr_subtitle::translate(&text, Some(PREVIEW_SEED));
    Ok(Json(json!({ "original": text, "translated": translated })))
}
