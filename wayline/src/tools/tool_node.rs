//! Node that calls one registered tool with the run state as its arguments.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::NodeError;
use crate::graph::{Next, Node, RunContext};
use crate::state::State;

use super::Tool;

/// Calls `tool` with the whole state (reserved keys stripped) and merges the
/// returned object into state. A tool error or a non-object result fails the node.
pub struct ToolNode {
    id: String,
    tool: Arc<dyn Tool>,
}

impl ToolNode {
    pub fn new(id: impl Into<String>, tool: Arc<dyn Tool>) -> Self {
        Self {
            id: id.into(),
            tool,
        }
    }

    pub fn tool_name(&self) -> &str {
        self.tool.name()
    }
}

#[async_trait]
impl Node for ToolNode {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, mut state: State, ctx: &RunContext) -> Result<(State, Next), NodeError> {
        let args = state.without_reserved().into();
        tracing::debug!(run_id = %ctx.run_id, node_id = %self.id, tool = %self.tool.name(), "calling tool");
        let out = self
            .tool
            .call(args)
            .await
            .map_err(|e| NodeError::new(format!("tool {} failed: {}", self.tool.name(), e)))?;
        match out {
            Value::Object(update) => {
                state.merge(update);
                Ok((state, Next::Continue))
            }
            other => Err(NodeError::new(format!(
                "tool {} returned a non-object result: {}",
                self.tool.name(),
                other
            ))),
        }
    }
}
