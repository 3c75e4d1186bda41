//! Edge table: default successor of each node.
//!
//! Consulted after a node returns `Next::Continue`. Explicit `Goto`, `Repeat` and
//! `Halt` signals bypass it and never modify it.

use std::collections::HashMap;

use crate::error::RoutingError;
use crate::state::State;

use super::{BranchRouter, END};

/// Outgoing entry for one node.
#[derive(Clone, Debug)]
pub enum Edge {
    /// Single static successor.
    To(String),
    /// Terminal marker: the run completes after this node.
    End,
    /// Successor chosen from state among declared candidates.
    Branch(BranchRouter),
}

/// Where to go after a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Node(String),
    End,
}

impl Route {
    fn from_target(target: String) -> Self {
        if target == END {
            Route::End
        } else {
            Route::Node(target)
        }
    }
}

/// Static mapping from node id to its outgoing [`Edge`].
///
/// A node without an entry is terminal.
#[derive(Clone, Debug, Default)]
pub struct EdgeTable {
    entries: HashMap<String, Edge>,
}

impl EdgeTable {
    pub(super) fn new(entries: HashMap<String, Edge>) -> Self {
        Self { entries }
    }

    pub fn get(&self, node: &str) -> Option<&Edge> {
        self.entries.get(node)
    }

    /// Resolves the default successor of `node` for the given state.
    pub fn resolve(&self, node: &str, state: &State) -> Result<Route, RoutingError> {
        match self.entries.get(node) {
            None | Some(Edge::End) => Ok(Route::End),
            Some(Edge::To(next)) => Ok(Route::from_target(next.clone())),
            Some(Edge::Branch(router)) => router.resolve(node, state).map(Route::from_target),
        }
    }

    /// True when the node's entry can end the run (terminal, missing, or a branch with END).
    pub fn is_terminal(&self, node: &str) -> bool {
        match self.entries.get(node) {
            None | Some(Edge::End) => true,
            Some(Edge::To(next)) => next == END,
            Some(Edge::Branch(_)) => false,
        }
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = (&String, &Edge)> {
        self.entries.iter()
    }
}
