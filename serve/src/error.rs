//! API errors rendered as `{ "error": "..." }` JSON.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use wayline::CompilationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("invalid graph: {0}")]
    InvalidGraph(#[from] CompilationError),
    #[error("graph not found: {0}")]
    GraphNotFound(String),
    #[error("run not found: {0}")]
    RunNotFound(String),
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidGraph(_) => StatusCode::BAD_REQUEST,
            ApiError::GraphNotFound(_) | ApiError::RunNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(%status, error = %self, "request rejected");
        let body = match &self {
            ApiError::InvalidGraph(e) => json!({
                "error": self.to_string(),
                "issues": e.issues().iter().map(ToString::to_string).collect::<Vec<_>>(),
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
