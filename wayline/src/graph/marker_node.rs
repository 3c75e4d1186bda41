//! Marker node: records that it ran and follows the edge table.
//!
//! Default behaviour for nodes declared in a `GraphDefinition` without a tool.

use async_trait::async_trait;

use crate::error::NodeError;
use crate::state::State;

use super::{Next, Node, RunContext};

/// Sets `<id>_executed = true` and `<id>_message`, then returns `Next::Continue`.
pub struct MarkerNode {
    name: String,
}

impl MarkerNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Node for MarkerNode {
    fn id(&self) -> &str {
        &self.name
    }

    async fn run(&self, mut state: State, _ctx: &RunContext) -> Result<(State, Next), NodeError> {
        state.set(format!("{}_executed", self.name), true);
        state.set(
            format!("{}_message", self.name),
            format!("Node {} executed successfully", self.name),
        );
        Ok((state, Next::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: MarkerNode adds its two keys and leaves the rest of state intact.
    #[tokio::test]
    async fn marks_state_and_continues() {
        let node = MarkerNode::new("start");
        let mut state = State::new();
        state.set("x", 1);
        let (out, next) = node
            .run(state, &RunContext::detached("start"))
            .await
            .unwrap();
        assert_eq!(next, Next::Continue);
        assert_eq!(out.get_bool("start_executed"), Some(true));
        assert!(out.get_str("start_message").unwrap().contains("start"));
        assert_eq!(out.get_i64("x"), Some(1));
    }
}
