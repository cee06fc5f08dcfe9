use axum::Json;
use axum::extract::State;
use serde_json::Value;

use super::super::AppState;
use super::super::error::ApiError;
use super::blob_or_empty;

pub async fn list_connectors(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let connectors = state.store.list_connectors().await?;
    Ok(Json(serde_json::json!({ "data": connectors })))
}

#[derive(serde::Deserialize)]
pub struct CreateConnectorRequest {
    app_id: Option<i64>,
    provider: String,
    #[serde(default)]
    config: Option<Value>,
}

pub async fn create_connector(
    State(state): State<AppState>,
    Json(payload): Json<CreateConnectorRequest>,
) -> Result<Json<Value>, ApiError> {
    let config = blob_or_empty(payload.config);
    let connector = state
        .store
        .create_connector(payload.app_id, &payload.provider, &config)
        .await?;
    Ok(Json(serde_json::json!({ "data": connector })))
}

/// Pass-through proxy to the Vercel projects listing; the token never
/// reaches the browser.
pub async fn vercel_projects(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let token = state
        .config
        .vercel_token
        .as_deref()
        .ok_or(ApiError::MissingToken("VERCEL_TOKEN"))?;

    let data = state
        .http
        .get("https://api.vercel.com/v9/projects")
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await?
        .json::<Value>()
        .await?;
    Ok(Json(data))
}

pub async fn github_repos(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let token = state
        .config
        .github_token
        .as_deref()
        .ok_or(ApiError::MissingToken("GITHUB_TOKEN"))?;

    let data = state
        .http
        .get("https://api.github.com/user/repos?per_page=100")
        .header("Authorization", format!("Bearer {token}"))
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", "opsdeck")
        .send()
        .await?
        .json::<Value>()
        .await?;
    Ok(Json(data))
}
