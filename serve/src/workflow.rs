//! `POST /workflow/code-review/run`: runs the built-in review graph on a snippet.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use wayline::workflows::code_review;
use wayline::{ReviewOptions, RunRecord};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub(crate) struct CodeReviewRequest {
    code: String,
    #[serde(default)]
    quality_threshold: Option<i64>,
    #[serde(default)]
    max_loop_iterations: Option<i64>,
}

pub(crate) async fn code_review(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CodeReviewRequest>, JsonRejection>,
) -> Result<Json<RunRecord>, ApiError> {
    let Json(req) = body?;
    if req.code.trim().is_empty() {
        return Err(ApiError::BadRequest("code must not be empty".to_string()));
    }
    let graph = state
        .graph(code_review::GRAPH_NAME)
        .ok_or_else(|| ApiError::GraphNotFound(code_review::GRAPH_NAME.to_string()))?;
    let defaults = ReviewOptions::default();
    let options = ReviewOptions {
        quality_threshold: req
            .quality_threshold
            .unwrap_or(state.settings.quality_threshold),
        max_loop_iterations: req
            .max_loop_iterations
            .unwrap_or(defaults.max_loop_iterations),
    };
    let record = state
        .executor
        .run(&graph, options.initial_state(req.code), None)
        .await;
    info!(run_id = %record.run_id, status = ?record.status, steps = record.steps, "code review finished");
    Ok(Json(record))
}
