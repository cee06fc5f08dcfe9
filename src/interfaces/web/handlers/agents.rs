use axum::Json;
use axum::extract::State;
use serde_json::Value;

use super::super::AppState;
use super::super::error::ApiError;

/// Seeds the fixed roster on first call, then lists by name.
pub async fn list_agents(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.ensure_seed_agents().await?;
    let agents = state.store.list_agents().await?;
    Ok(Json(serde_json::json!({ "data": agents })))
}
