use axum::Json;
use axum::extract::State;
use serde_json::Value;
use tracing::info;

use super::super::AppState;
use super::super::error::ApiError;
use super::blob_or_empty;
use crate::core::runner::TaskRunner;

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let tasks = state.store.list_tasks().await?;
    Ok(Json(serde_json::json!({ "data": tasks })))
}

#[derive(serde::Deserialize)]
pub struct CreateTaskRequest {
    app_id: Option<i64>,
    agent_id: Option<i64>,
    #[serde(rename = "type")]
    task_type: Option<String>,
    #[serde(default)]
    input: Option<Value>,
    priority: Option<i64>,
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<Json<Value>, ApiError> {
    let input = blob_or_empty(payload.input);
    let task = state
        .store
        .create_task(
            payload.app_id,
            payload.agent_id,
            payload.task_type.as_deref(),
            &input,
            payload.priority.unwrap_or(3),
        )
        .await?;

    // Queueing is announced in the war room, like every other task event.
    let convo = state.store.ensure_conversation().await?;
    state
        .store
        .create_message(
            convo.id,
            "System",
            "agent",
            &format!(
                "Task queued: {}",
                task.task_type.as_deref().unwrap_or("task")
            ),
            None,
            None,
        )
        .await?;

    Ok(Json(serde_json::json!({ "data": task })))
}

#[derive(serde::Deserialize)]
pub struct RunTaskRequest {
    task_id: Option<i64>,
    summary: Option<String>,
}

pub async fn run_task(
    State(state): State<AppState>,
    Json(payload): Json<RunTaskRequest>,
) -> Result<Json<Value>, ApiError> {
    info!(task_id = ?payload.task_id, "starting scripted task run");
    let runner = TaskRunner::new(state.store.db_handle());
    runner
        .run(payload.task_id, payload.summary.as_deref())
        .await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
