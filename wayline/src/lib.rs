//! # Wayline
//!
//! A small graph execution engine with a **state-in, state-out** design: one
//! ordered [`State`] map flows through nodes, and each node hands back the
//! updated state plus a [`Next`] signal saying where to go.
//!
//! ## Design principles
//!
//! - **Routing by return value**: a node returns `Continue` (follow the edge table),
//!   `Goto(id)`, `Repeat` or `Halt`. Branches choose among declared candidates only.
//! - **Fail fast at construction**: [`StateGraph::compile`] rejects dangling references,
//!   duplicate ids and a missing entry, all at once ([`CompilationError`]).
//! - **Bounded runs**: [`RunLimits::max_iterations`] caps node invocations; loops and
//!   cycles end as `LimitExceeded` with the partial state kept.
//! - **Observable runs**: every step is logged with a state snapshot in a [`RunRecord`],
//!   readable through [`Executor::get`] while the run is in progress.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledGraph`], [`Node`], [`Next`], [`Executor`], [`RunContext`].
//! - [`state`]: [`State`].
//! - [`run`]: [`RunRecord`], [`RunStatus`], [`LogEntry`], [`RunStore`].
//! - [`tools`]: [`Tool`], [`ToolRegistry`], [`ToolNode`] and the built-in code-analysis tools.
//! - [`workflows`]: the code-review graph and [`GraphDefinition`] (JSON).
//! - [`error`]: [`NodeError`], [`RoutingError`], [`RunFailure`].
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use wayline::{Executor, FnNode, Next, RunLimits, RunStatus, State, StateGraph, END};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut graph = StateGraph::new("double");
//! graph
//!     .add_node(
//!         "double",
//!         Arc::new(FnNode::new("double", |mut state, _ctx| {
//!             let x = state.get_i64("x").unwrap_or(0);
//!             state.set("x", x * 2);
//!             Ok((state, Next::Continue))
//!         })),
//!     )
//!     .add_edge("double", END);
//! let graph = graph.compile(RunLimits::default()).unwrap();
//!
//! let mut state = State::new();
//! state.set("x", 21);
//! let record = Executor::new().run(&graph, state, None).await;
//! assert_eq!(record.status, RunStatus::Completed);
//! assert_eq!(record.final_state.unwrap().get_i64("x"), Some(42));
//! # }
//! ```

pub mod error;
pub mod graph;
pub mod run;
pub mod state;
pub mod tools;
pub mod workflows;

pub use error::{NodeError, RoutingError, RunFailure};
pub use graph::{
    generate_dot, generate_text, BranchFn, CompilationError, CompiledGraph, Executor, FnNode,
    MarkerNode, Next, Node, RunContext, RunLimits, StateGraph, DEFAULT_MAX_ITERATIONS, END, START,
};
pub use run::{LogEntry, RunId, RunRecord, RunStatus, RunStore, RunSummary};
pub use state::State;
pub use tools::{Tool, ToolError, ToolNode, ToolRegistry, ToolSpec};
pub use workflows::{GraphDefinition, ReviewOptions};
