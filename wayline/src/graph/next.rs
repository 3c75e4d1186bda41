//! Control signal returned by a node alongside its state.
//!
//! The executor uses it to pick the next node or to stop. It never travels inside
//! [`State`](crate::State), so workflow keys cannot collide with routing.

use serde::{Deserialize, Serialize};

/// Next step after running a node.
///
/// - **Continue**: follow the edge table (static successor, branch, or terminal).
/// - **Goto(id)**: run `id` next; overrides the edge table for this step only.
/// - **Repeat**: run the same node again.
/// - **Halt**: end the run successfully regardless of the edge table.
///
/// **Interaction**: Returned by `Node::run`; consumed by `Executor` and recorded in each `LogEntry`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "node", rename_all = "snake_case")]
pub enum Next {
    Continue,
    Goto(String),
    Repeat,
    Halt,
}

impl Next {
    pub fn goto(node: impl Into<String>) -> Self {
        Next::Goto(node.into())
    }
}
