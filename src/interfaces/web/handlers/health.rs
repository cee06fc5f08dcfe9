use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use super::super::AppState;

/// The only route that reports store failure distinctly.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.now().await {
        Ok(now) => (
            StatusCode::OK,
            Json(serde_json::json!({ "ok": true, "db": true, "now": now })),
        ),
        Err(e) => {
            warn!("health check failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "ok": false, "db": false })),
            )
        }
    }
}
