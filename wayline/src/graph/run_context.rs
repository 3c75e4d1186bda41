//! Run context passed into nodes.
//!
//! Read-only view of where the run is: run id, graph, node, step and the bound.
//! Nodes use it for loop counters and log correlation instead of reserved state keys.

use crate::run::RunId;

/// Per-step context handed to `Node::run`.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: RunId,
    pub graph_name: String,
    /// Id of the node being invoked.
    pub node_id: String,
    /// Zero-based step index of this invocation.
    pub step: usize,
    /// Iteration bound for this run.
    pub max_iterations: usize,
}

impl RunContext {
    /// True when this invocation is the last one the bound allows.
    pub fn is_last_step(&self) -> bool {
        self.step + 1 >= self.max_iterations
    }

    /// Context for calling a node outside an executor (tests, one-off invocations).
    pub fn detached(node_id: impl Into<String>) -> Self {
        Self {
            run_id: RunId::new(),
            graph_name: String::new(),
            node_id: node_id.into(),
            step: 0,
            max_iterations: super::DEFAULT_MAX_ITERATIONS,
        }
    }
}
