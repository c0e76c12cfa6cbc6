//! API integration tests.
//!
//! Exercises the router with axum's test utilities against a
//! [`TestHarness`] backed by an in-memory database.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use common::{FakeSource, TestHarness, SAMPLE_SRT};
use http_body_util::BodyExt;
use piratarr::settings::Settings;
use piratarr_common::{JobStatus, MediaId, MediaKind};
use piratarr_db::queries::{jobs, media};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Health and status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_200() {
    let h = TestHarness::new();
    let (status, _) = get(h.router(), "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn status_reports_counts() {
    let h = TestHarness::new();
    let (movie, _) = h.movie_with_subtitle(1, "Hook");
    h.provider.set(vec![FakeSource::ok("radarr", vec![movie])]);
    h.scanner.scan_now().await.unwrap();

    let (status, body) = get(h.router(), "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scanner_running"], false);
    assert_eq!(body["is_scanning"], false);
    assert!(body["last_scan"].is_string());
    assert_eq!(body["media"]["total"], 1);
    assert_eq!(body["media"]["with_subtitles"], 1);
    assert_eq!(body["jobs"]["completed"], 1);
    assert_eq!(body["jobs"]["pending"], 0);
}

// ---------------------------------------------------------------------------
// Media and jobs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn media_list_filters_by_type() {
    let h = TestHarness::new();
    {
        let conn = h.conn();
        media::upsert_media(&conn, 1, MediaKind::Movie, "Hook", "/m/hook.mkv", false, Utc::now())
            .unwrap();
        media::upsert_media(&conn, 2, MediaKind::Episode, "Archer S01E01", "/t/a.mkv", true, Utc::now())
            .unwrap();
    }

    let (status, all) = get(h.router(), "/api/media").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(all[0]["title"], "Archer S01E01");

    let (_, movies) = get(h.router(), "/api/media?type=movie").await;
    assert_eq!(movies.as_array().unwrap().len(), 1);
    assert_eq!(movies[0]["media_kind"], "movie");

    let (status, _) = get(h.router(), "/api/media?type=podcast").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn jobs_list_and_retry() {
    let h = TestHarness::new();
    let job = {
        let conn = h.conn();
        let job = jobs::create_job(&conn, "Hook", MediaKind::Movie, "/m/hook.srt", JobStatus::Pending, Utc::now())
            .unwrap();
        jobs::create_job(&conn, "Pan", MediaKind::Movie, "/m/pan.srt", JobStatus::Pending, Utc::now())
            .unwrap();
        job
    };

    let (_, listed) = get(h.router(), "/api/jobs?limit=1").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["media_title"], "Pan");

    // Pending jobs cannot be retried
    let (status, body) = post(h.router(), &format!("/api/jobs/{}/retry", job.id), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    {
        let conn = h.conn();
        jobs::start_job(&conn, job.id).unwrap();
        jobs::fail_job(&conn, job.id, "boom").unwrap();
    }
    let (_, failed) = get(h.router(), "/api/jobs?status=failed").await;
    assert_eq!(failed.as_array().unwrap().len(), 1);

    let (status, body) = post(h.router(), &format!("/api/jobs/{}/retry", job.id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["status"], "pending");
    assert!(body["job"]["error_message"].is_null());

    let (status, body) = post(h.router(), "/api/jobs/not-a-job/retry", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn translate_single_file() {
    let h = TestHarness::new();
    let source = h.write_file("manual/Movie.en.srt", SAMPLE_SRT);

    let (status, body) = post(
        h.router(),
        "/api/translate",
        json!({ "path": source.to_string_lossy() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["status"], "completed");
    assert_eq!(body["job"]["media_kind"], "manual");
    assert_eq!(body["job"]["media_title"], "Movie.en.srt");
    assert_eq!(body["job"]["entry_count"], 2);
    assert!(h.root().join("manual/Movie.pirate.en.srt").exists());
}

#[tokio::test]
async fn translate_file_errors() {
    let h = TestHarness::new();

    let (status, _) = post(h.router(), "/api/translate", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = h.root().join("missing.srt");
    let (status, _) = post(h.router(), "/api/translate", json!({ "path": missing.to_string_lossy() })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let text = h.write_file("notes.txt", "ahoy");
    let (status, _) = post(h.router(), "/api/translate", json!({ "path": text.to_string_lossy() })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let broken = h.write_file("broken.srt", [0xff, 0xff]);
    let (status, body) = post(h.router(), "/api/translate", json!({ "path": broken.to_string_lossy() })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["job"]["status"], "failed");
    assert!(body["error"].as_str().unwrap().starts_with("Translation failed"));
}

#[tokio::test]
async fn translate_media_by_id() {
    let h = TestHarness::new();
    h.save_settings(&Settings {
        auto_translate: false,
        ..Settings::default()
    });
    let (movie, _) = h.movie_with_subtitle(1, "Hook");
    h.provider.set(vec![FakeSource::ok("radarr", vec![movie])]);
    h.scanner.scan_now().await.unwrap();
    let id = media::list_media(&h.conn(), None).unwrap()[0].id;

    let uri = format!("/api/media/{id}/translate");
    let (status, body) = post(h.router(), &uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs_created"], 1);

    let (status, body) = post(h.router(), &uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs_created"], 0);
    assert_eq!(body["message"], "Already translated");

    let (status, _) = post(h.router(), &format!("/api/media/{}/translate", MediaId::new()), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn translate_media_without_subtitles_is_404() {
    let h = TestHarness::new();
    let media_file = h.write_file("Bare/Bare.mkv", b"");
    let entry = media::upsert_media(
        &h.conn(),
        9,
        MediaKind::Movie,
        "Bare",
        &media_file.to_string_lossy(),
        false,
        Utc::now(),
    )
    .unwrap();

    let (status, _) = post(h.router(), &format!("/api/media/{}/translate", entry.id), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn batch_translate() {
    let h = TestHarness::new();

    let (status, _) = post(h.router(), "/api/translate/batch", json!({ "media_ids": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    h.save_settings(&Settings {
        auto_translate: false,
        ..Settings::default()
    });
    let (a, _) = h.movie_with_subtitle(1, "Hook");
    let (b, _) = h.movie_with_subtitle(2, "Pan");
    h.provider.set(vec![FakeSource::ok("radarr", vec![a, b])]);
    h.scanner.scan_now().await.unwrap();
    let ids: Vec<MediaId> = media::list_media(&h.conn(), None)
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();

    let (status, body) = post(h.router(), "/api/translate/batch", json!({ "media_ids": ids })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs_created"], 2);
    assert_eq!(body["message"], "Translated 2 subtitle file(s)");
}

#[tokio::test]
async fn scan_endpoint_returns_summary() {
    let h = TestHarness::new();
    let (movie, _) = h.movie_with_subtitle(1, "Hook");
    h.provider.set(vec![FakeSource::ok("radarr", vec![movie])]);

    let (status, body) = post(h.router(), "/api/scan", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Scan complete");
    assert_eq!(body["summary"]["movies_found"], 1);
    assert_eq!(body["summary"]["translations_queued"], 1);
}

#[tokio::test]
async fn preview_is_deterministic() {
    let h = TestHarness::new();
    let (status, first) = post(h.router(), "/api/preview", json!({ "text": "Hello friend." })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["original"], "Hello friend.");
    assert!(first["translated"].as_str().unwrap().starts_with("Ahoy matey."));

    let (_, second) = post(h.router(), "/api/preview", json!({ "text": "Hello friend." })).await;
    assert_eq!(first["translated"], second["translated"]);

    let (status, _) = post(h.router(), "/api/preview", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn settings_round_trip_with_masking() {
    let h = TestHarness::new();

    let (status, _) = post(
        h.router(),
        "/api/settings",
        json!({
            "radarr_url": "http://radarr:7878",
            "radarr_api_key": "0123456789",
            "sonarr_api_key": "abc",
            "scan_interval": "600",
            "auto_translate": "false",
            "path_mappings": [
                { "remote_path": "/movies", "local_path": "/mnt/movies" },
                { "remote_path": "/tv", "local_path": "" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(h.router(), "/api/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["radarr_url"], "http://radarr:7878");
    assert_eq!(body["radarr_api_key"], "0123456789");
    assert_eq!(body["radarr_api_key_masked"], "0123******");
    assert_eq!(body["sonarr_api_key_masked"], "");
    assert_eq!(body["scan_interval"], 600);
    assert_eq!(body["auto_translate"], false);
    assert_eq!(body["path_mappings"].as_array().unwrap().len(), 1);
    assert_eq!(body["path_mappings"][0]["local_path"], "/mnt/movies");
}

#[tokio::test]
async fn settings_test_validates_input() {
    let h = TestHarness::new();

    let (status, _) = post(h.router(), "/api/settings/test", json!({ "service": "radarr" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        h.router(),
        "/api/settings/test",
        json!({ "service": "lidarr", "url": "http://x", "api_key": "k" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
