//! Branch routing: choose the successor of a node from state.
//!
//! A source node has a router function that takes the current state and returns a
//! node id. The id must be one of the candidates declared when the branch was added;
//! anything else is a routing error at that step, never a silent fallback.
//!
//! **Interaction**: Built by `StateGraph::add_branch`, stored in the `EdgeTable`
//! as `Edge::Branch`, resolved by the executor after the source node runs.

use std::sync::Arc;

use crate::error::RoutingError;
use crate::state::State;

/// Router function: takes a reference to state and returns the next node id (or `END`).
pub type BranchFn = Arc<dyn Fn(&State) -> String + Send + Sync>;

/// Branch definition: router plus its declared candidate set.
#[derive(Clone)]
pub struct BranchRouter {
    path: BranchFn,
    candidates: Vec<String>,
}

impl BranchRouter {
    pub fn new(path: BranchFn, candidates: Vec<String>) -> Self {
        Self { path, candidates }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Calls the router and checks the answer against the candidates.
    ///
    /// `from` is the source node id, used in the error.
    pub fn resolve(&self, from: &str, state: &State) -> Result<String, RoutingError> {
        let chosen = (self.path)(state);
        if self.candidates.iter().any(|c| *c == chosen) {
            Ok(chosen)
        } else {
            Err(RoutingError::OutsideCandidates {
                from: from.to_string(),
                chosen,
                candidates: self.candidates.clone(),
            })
        }
    }
}

impl std::fmt::Debug for BranchRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BranchRouter")
            .field("candidates", &self.candidates)
            .finish()
    }
}
