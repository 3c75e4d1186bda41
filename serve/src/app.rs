//! Axum app: shared state and router.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::{json, Value};
use wayline::workflows::code_review;
use wayline::{CompilationError, CompiledGraph, Executor, ReviewOptions, RunLimits, ToolRegistry};

use crate::{graphs, tools, workflow};

/// Shared by every request.
///
/// Compiled graphs are immutable and held behind `Arc`, so a run never blocks
/// graph registration. Runs live in the executor's store.
pub struct AppState {
    pub(crate) executor: Executor,
    pub(crate) tools: Arc<ToolRegistry>,
    pub(crate) graphs: DashMap<String, Arc<CompiledGraph>>,
    pub(crate) settings: config::Settings,
}

/// Listing entry for `GET /graph/list`.
#[derive(Debug, Clone, Serialize)]
pub struct GraphInfo {
    pub graph_id: String,
    pub name: String,
    pub entry: String,
    pub nodes: Vec<String>,
    pub max_iterations: usize,
}

impl GraphInfo {
    pub(crate) fn new(graph_id: &str, graph: &CompiledGraph) -> Self {
        Self {
            graph_id: graph_id.to_string(),
            name: graph.name().to_string(),
            entry: graph.entry().to_string(),
            nodes: graph.node_ids().to_vec(),
            max_iterations: graph.limits().max_iterations(),
        }
    }
}

impl AppState {
    /// Builtin tools plus the code-review graph registered under its own name.
    pub fn new(settings: config::Settings) -> Result<Self, CompilationError> {
        let tools = Arc::new(ToolRegistry::with_builtin());
        let options = ReviewOptions {
            quality_threshold: settings.quality_threshold,
            ..ReviewOptions::default()
        };
        let review = code_review::build(
            tools.clone(),
            options,
            RunLimits::new(settings.max_iterations)?,
        )?;
        let graphs = DashMap::new();
        graphs.insert(code_review::GRAPH_NAME.to_string(), Arc::new(review));
        Ok(Self {
            executor: Executor::new(),
            tools,
            graphs,
            settings,
        })
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub(crate) fn graph(&self, graph_id: &str) -> Option<Arc<CompiledGraph>> {
        self.graphs.get(graph_id).map(|g| g.value().clone())
    }
}

async fn index() -> Json<Value> {
    Json(json!({
        "service": "wayline",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /graph/create",
            "POST /graph/run",
            "GET /graph/state/{run_id}",
            "GET /graph/list",
            "GET /runs",
            "GET /tools",
            "POST /workflow/code-review/run",
        ],
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/graph/create", post(graphs::create))
        .route("/graph/run", post(graphs::run))
        .route("/graph/state/:run_id", get(graphs::run_state))
        .route("/graph/list", get(graphs::list))
        .route("/runs", get(graphs::runs))
        .route("/tools", get(tools::list))
        .route("/workflow/code-review/run", post(workflow::code_review))
        .with_state(state)
}
