use axum::Json;
use axum::extract::{Path, State};
use serde_json::Value;

use super::super::AppState;
use super::super::error::ApiError;

pub async fn list_approvals(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let approvals = state.store.list_approvals().await?;
    Ok(Json(serde_json::json!({ "data": approvals })))
}

#[derive(serde::Deserialize)]
pub struct CreateApprovalRequest {
    task_id: Option<i64>,
    action: String,
    requested_by: Option<String>,
}

pub async fn create_approval(
    State(state): State<AppState>,
    Json(payload): Json<CreateApprovalRequest>,
) -> Result<Json<Value>, ApiError> {
    let approval = state
        .store
        .create_approval(
            payload.task_id,
            &payload.action,
            payload.requested_by.as_deref().unwrap_or("System"),
        )
        .await?;
    Ok(Json(serde_json::json!({ "data": approval })))
}

#[derive(serde::Deserialize)]
pub struct DecideApprovalRequest {
    status: String,
    approved_by: Option<String>,
}

/// Records the decision unconditionally; an already-decided approval can be
/// re-decided and an unknown id yields `data: null`.
pub async fn decide_approval(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<DecideApprovalRequest>,
) -> Result<Json<Value>, ApiError> {
    let approval = state
        .store
        .decide_approval(
            id,
            &payload.status,
            payload.approved_by.as_deref().unwrap_or("Human"),
        )
        .await?;
    Ok(Json(serde_json::json!({ "data": approval })))
}
