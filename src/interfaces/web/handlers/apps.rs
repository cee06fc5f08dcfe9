use axum::Json;
use axum::extract::State;
use serde_json::Value;

use super::super::AppState;
use super::super::error::ApiError;
use super::blob_or_empty;

pub async fn list_apps(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let apps = state.store.list_apps().await?;
    Ok(Json(serde_json::json!({ "data": apps })))
}

#[derive(serde::Deserialize)]
pub struct CreateAppRequest {
    name: Option<String>,
    domain: Option<String>,
    repo_url: Option<String>,
    #[serde(default)]
    stack: Option<Value>,
}

pub async fn create_app(
    State(state): State<AppState>,
    Json(payload): Json<CreateAppRequest>,
) -> Result<Json<Value>, ApiError> {
    let stack = blob_or_empty(payload.stack);
    let app = state
        .store
        .create_app(
            payload.name.as_deref(),
            payload.domain.as_deref(),
            payload.repo_url.as_deref(),
            &stack,
        )
        .await?;
    Ok(Json(serde_json::json!({ "data": app })))
}
