//! Graph node trait: one step in a graph.
//!
//! Receives the run's [`State`] and a [`RunContext`], returns the updated state and
//! a [`Next`] signal, or a [`NodeError`] that fails the run.

use async_trait::async_trait;

use crate::error::NodeError;
use crate::state::State;

use super::{Next, RunContext};

/// One step in a graph: state in, (state out, next step).
///
/// The executor treats a node as an opaque capability: tool calls, branching logic
/// and plain computation all plug in through this trait. Built-in kinds are
/// [`FnNode`](super::FnNode), [`MarkerNode`](super::MarkerNode) and
/// [`ToolNode`](crate::tools::ToolNode).
///
/// The state is moved in and handed back; a node cannot touch any other run's state.
#[async_trait]
pub trait Node: Send + Sync {
    /// Node id (e.g. `"extract"`). Must be unique within a graph.
    fn id(&self) -> &str;

    /// One step: state in, (state out, next step).
    ///
    /// Return `Next::Continue` to follow the edge table, `Next::Goto(id)` to jump,
    /// `Next::Repeat` to run again, `Next::Halt` to stop.
    async fn run(&self, state: State, ctx: &RunContext) -> Result<(State, Next), NodeError>;
}
