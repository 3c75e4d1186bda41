//! Closure-backed node.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::NodeError;
use crate::state::State;

use super::{Next, Node, RunContext};

/// Step function signature used by [`FnNode`].
pub type StepFn = Arc<dyn Fn(State, &RunContext) -> Result<(State, Next), NodeError> + Send + Sync>;

/// Node whose computation is a synchronous closure.
///
/// ```rust
/// use wayline::{FnNode, Next};
///
/// let double = FnNode::new("double", |mut state, _ctx| {
///     let x = state.get_i64("x").unwrap_or(0);
///     state.set("x", x * 2);
///     Ok((state, Next::Continue))
/// });
/// ```
#[derive(Clone)]
pub struct FnNode {
    id: String,
    step: StepFn,
}

impl FnNode {
    pub fn new<F>(id: impl Into<String>, step: F) -> Self
    where
        F: Fn(State, &RunContext) -> Result<(State, Next), NodeError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            step: Arc::new(step),
        }
    }
}

impl std::fmt::Debug for FnNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnNode").field("id", &self.id).finish()
    }
}

#[async_trait]
impl Node for FnNode {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, state: State, ctx: &RunContext) -> Result<(State, Next), NodeError> {
        (self.step)(state, ctx)
    }
}
