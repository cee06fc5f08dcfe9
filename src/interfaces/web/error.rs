use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Web-boundary error. Store and runner failures surface as a generic 500;
/// the taxonomy is deliberately flat beyond the three cases the API
/// distinguishes.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Missing {0}")]
    MissingToken(&'static str),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("{0}")]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidSignature => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (code, Json(body)).into_response()
    }
}
