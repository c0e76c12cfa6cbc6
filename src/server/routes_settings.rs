use crate::arr;
use crate::server::{AppContext, AppError};
use crate::settings::{mask_api_key, Settings, SettingsUpdate};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use piratarr_common::Error;
use piratarr_db::pool::get_conn;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub fn settings_routes() -> Router<AppContext> {
    Router::new()
        .route("/settings", get(get_settings).post(save_settings))
        .route("/settings/test", post(test_connection))
}

#[derive(Serialize)]
struct SettingsResponse {
    #[serde(flatten)]
    settings: Settings,
    radarr_api_key_masked: String,
    sonarr_api_key_masked: String,
}

async fn get_settings(State(ctx): State<AppContext>) -> Result<impl IntoResponse, AppError> {
    let conn = get_conn(&ctx.db)?;
    let settings = Settings::load(&conn)?;

    Ok(Json(SettingsResponse {
        radarr_api_key_masked: mask_api_key(&settings.radarr_api_key),
        sonarr_api_key_masked: mask_api_key(&settings.sonarr_api_key),
        settings,
    }))
}

async fn save_settings(
    State(ctx): State<AppContext>,
    Json(update): Json<SettingsUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let conn = get_conn(&ctx.db)?;
    update.apply(&conn)?;
    tracing::info!("Settings saved");
    Ok(Json(json!({ "message": "Settings saved" })))
}

#[derive(Deserialize)]
struct TestConnectionRequest {
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
}

async fn test_connection(
    Json(payload): Json<TestConnectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    let (Some(service), Some(url), Some(api_key)) = (
        non_empty(payload.service),
        non_empty(payload.url),
        non_empty(payload.api_key),
    ) else {
        return Err(Error::validation("Missing service, url, or api_key").into());
    };

    let client = arr::client_for(&service, &url, &api_key)
        .ok_or_else(|| Error::validation(format!("Unknown service: {service}")))?;

    let body = match client.test_connection().await {
        Ok(success) => json!({ "success": success }),
        Err(e) => {
            tracing::warn!(service = %service, "Connection test failed: {:#}", e);
            json!({ "success": false, "error": format!("{e:#}") })
        }
    };
    Ok(Json(body))
}
