//! Graph and run endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use wayline::{GraphDefinition, RunId, RunLimits, RunRecord, RunStatus, RunSummary};

use crate::app::{AppState, GraphInfo};
use crate::error::ApiError;

fn default_wait() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunGraphRequest {
    graph_id: String,
    #[serde(default)]
    initial_state: wayline::State,
    /// Overrides the graph's bound for this run only.
    #[serde(default)]
    max_iterations: Option<usize>,
    /// `true`: respond with the finished record. `false`: respond with the run id at once.
    #[serde(default = "default_wait")]
    wait: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct RunStarted {
    run_id: RunId,
    status: RunStatus,
}

/// `POST /graph/create`: compiles a [`GraphDefinition`] and stores it under a new id.
pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GraphDefinition>, JsonRejection>,
) -> Result<Json<GraphInfo>, ApiError> {
    let Json(definition) = body?;
    let compiled = definition.build(&state.tools)?;
    let graph_id = uuid::Uuid::new_v4().to_string();
    let info = GraphInfo::new(&graph_id, &compiled);
    info!(graph_id = %graph_id, name = %info.name, nodes = info.nodes.len(), "graph created");
    state.graphs.insert(graph_id, Arc::new(compiled));
    Ok(Json(info))
}

/// `POST /graph/run`
pub(crate) async fn run(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RunGraphRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = body?;
    let graph = state
        .graph(&req.graph_id)
        .ok_or_else(|| ApiError::GraphNotFound(req.graph_id.clone()))?;
    let limits = req
        .max_iterations
        .map(RunLimits::new)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if req.wait {
        let record = state
            .executor
            .run(&graph, req.initial_state, limits)
            .await;
        info!(run_id = %record.run_id, status = ?record.status, steps = record.steps, "run finished");
        return to_json(&record);
    }
    let run_id = state.executor.start(graph, req.initial_state, limits);
    let status = state
        .executor
        .store()
        .status(&run_id)
        .unwrap_or(RunStatus::Pending);
    info!(run_id = %run_id, graph_id = %req.graph_id, "run started");
    to_json(&RunStarted { run_id, status })
}

/// `GET /graph/state/:run_id`
pub(crate) async fn run_state(
    State(state): State<Arc<AppState>>,
    Path(run_id): Path<String>,
) -> Result<Json<RunRecord>, ApiError> {
    let id: RunId = run_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("not a run id: {}", run_id)))?;
    state
        .executor
        .get(&id)
        .map(Json)
        .ok_or(ApiError::RunNotFound(run_id))
}

/// `GET /graph/list`, ordered by id.
pub(crate) async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<GraphInfo>> {
    let mut graphs: Vec<GraphInfo> = state
        .graphs
        .iter()
        .map(|g| GraphInfo::new(g.key(), g.value()))
        .collect();
    graphs.sort_by(|a, b| a.graph_id.cmp(&b.graph_id));
    Json(graphs)
}

/// `GET /runs`, oldest first.
pub(crate) async fn runs(State(state): State<Arc<AppState>>) -> Json<Vec<RunSummary>> {
    Json(state.executor.list())
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Json<serde_json::Value>, ApiError> {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}
