//! Logging helpers for graph execution.
//!
//! Structured `tracing` events for run start/finish and each node invocation.
//! Fields: `run_id`, `graph`, `node_id`, `step`.

use crate::error::RunFailure;
use crate::run::{RunId, RunStatus};

use super::Next;

/// Log run start.
pub fn log_run_start(run_id: &RunId, graph: &str, entry: &str, max_iterations: usize) {
    tracing::info!(%run_id, graph, entry, max_iterations, "Starting graph run");
}

/// Log node execution start.
pub fn log_node_start(run_id: &RunId, node_id: &str, step: usize) {
    tracing::debug!(%run_id, node_id, step, "Starting node execution");
}

/// Log node execution completion with the signal it returned.
pub fn log_node_complete(run_id: &RunId, node_id: &str, step: usize, next: &Next) {
    tracing::debug!(%run_id, node_id, step, ?next, "Node execution complete");
}

/// Log branch or edge-table routing.
pub fn log_route(run_id: &RunId, from: &str, to: &str) {
    tracing::debug!(%run_id, from, to, "routing");
}

/// Log run completion (any final status other than Failed).
pub fn log_run_finish(run_id: &RunId, status: RunStatus, steps: usize) {
    match status {
        RunStatus::LimitExceeded => {
            tracing::warn!(%run_id, ?status, steps, "Graph run stopped at iteration limit")
        }
        _ => tracing::info!(%run_id, ?status, steps, "Graph run complete"),
    }
}

/// Log run failure.
pub fn log_run_failed(run_id: &RunId, failure: &RunFailure, steps: usize) {
    tracing::error!(%run_id, %failure, steps, "Graph run failed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_functions() {
        let id = RunId::new();
        log_run_start(&id, "g", "start", 10);
        log_node_start(&id, "start", 0);
        log_node_complete(&id, "start", 0, &Next::Halt);
        log_route(&id, "start", "check");
        log_run_finish(&id, RunStatus::Completed, 1);
        log_run_finish(&id, RunStatus::LimitExceeded, 10);
        log_run_failed(
            &id,
            &RunFailure::Node {
                node: "start".into(),
                message: "boom".into(),
            },
            0,
        );
    }
}
