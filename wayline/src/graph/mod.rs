//! Graph building and execution.
//!
//! Build a [`StateGraph`] (nodes, edges, branches, entry, terminals), `compile` it
//! with [`RunLimits`] into a [`CompiledGraph`], then run it with an [`Executor`].
//! Each node returns its updated state plus a [`Next`] signal; the executor
//! follows the signal, falling back to the edge table on `Next::Continue`.

mod branch;
mod compile_error;
mod compiled;
mod edge;
mod executor;
mod fn_node;
mod limits;
mod logging;
mod marker_node;
mod next;
mod node;
mod run_context;
mod state_graph;
mod visualization;

pub use branch::{BranchFn, BranchRouter};
pub use compile_error::CompilationError;
pub use compiled::CompiledGraph;
pub use edge::{Edge, EdgeTable, Route};
pub use executor::Executor;
pub use fn_node::{FnNode, StepFn};
pub use limits::{RunLimits, DEFAULT_MAX_ITERATIONS};
pub use logging::{
    log_node_complete, log_node_start, log_route, log_run_failed, log_run_finish, log_run_start,
};
pub use marker_node::MarkerNode;
pub use next::Next;
pub use node::Node;
pub use run_context::RunContext;
pub use state_graph::{StateGraph, END, START};
pub use visualization::{generate_dot, generate_text};
