use axum::Json;
use axum::extract::{Query, State};
use serde_json::Value;

use super::super::AppState;
use super::super::error::ApiError;

pub async fn get_conversations(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let convo = state.store.ensure_conversation().await?;
    Ok(Json(serde_json::json!({ "data": [convo] })))
}

#[derive(serde::Deserialize)]
pub struct ListMessagesQuery {
    conversation_id: Option<i64>,
}

pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Value>, ApiError> {
    let convo = state.store.ensure_conversation().await?;
    let conversation_id = query.conversation_id.unwrap_or(convo.id);
    let messages = state.store.list_messages(conversation_id).await?;
    Ok(Json(
        serde_json::json!({ "data": messages, "conversation_id": conversation_id }),
    ))
}

pub async fn github_events(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let convo = state.store.ensure_conversation().await?;
    let events = state.store.github_events(convo.id).await?;
    Ok(Json(serde_json::json!({ "data": events })))
}

#[derive(serde::Deserialize)]
pub struct CreateMessageRequest {
    sender: Option<String>,
    role: Option<String>,
    content: String,
    conversation_id: Option<i64>,
    thread_id: Option<i64>,
}

pub async fn create_message(
    State(state): State<AppState>,
    Json(payload): Json<CreateMessageRequest>,
) -> Result<Json<Value>, ApiError> {
    let convo = state.store.ensure_conversation().await?;
    let message = state
        .store
        .create_message(
            payload.conversation_id.unwrap_or(convo.id),
            payload.sender.as_deref().unwrap_or("System"),
            payload.role.as_deref().unwrap_or("agent"),
            &payload.content,
            payload.thread_id,
            None,
        )
        .await?;
    Ok(Json(serde_json::json!({ "data": message })))
}
