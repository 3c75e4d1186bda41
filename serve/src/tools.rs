//! `GET /tools`: the tool catalog graph definitions can reference.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use wayline::ToolSpec;

use crate::app::AppState;

pub(crate) async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<ToolSpec>> {
    Json(state.tools.list())
}
