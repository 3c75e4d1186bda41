//! Compiled graph: immutable, shared by every run of it.
//!
//! Built by `StateGraph::compile`. Holds the node set, edge table, entry node,
//! terminal set and the run bound chosen at construction.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::{EdgeTable, Node, RunLimits};

/// Compiled graph: immutable structure, run by an [`Executor`](super::Executor).
///
/// Every successor named in the edge table resolves to a node; the entry node
/// exists. Reaching a terminal is not checked statically; cycles are bounded at
/// run time by `limits().max_iterations()`.
pub struct CompiledGraph {
    pub(super) name: String,
    pub(super) nodes: HashMap<String, Arc<dyn Node>>,
    /// Node ids in the order they were added (for listing and visualization).
    pub(super) node_order: Vec<String>,
    pub(super) edges: EdgeTable,
    pub(super) entry: String,
    /// Nodes whose edge-table entry ends the run.
    pub(super) terminals: BTreeSet<String>,
    pub(super) limits: RunLimits,
}

impl CompiledGraph {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn terminals(&self) -> &BTreeSet<String> {
        &self.terminals
    }

    /// Bound given at compile time; used when a run does not override it.
    pub fn limits(&self) -> RunLimits {
        self.limits
    }

    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Arc<dyn Node>> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> &[String] {
        &self.node_order
    }
}

impl std::fmt::Debug for CompiledGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("name", &self.name)
            .field("nodes", &self.node_order)
            .field("entry", &self.entry)
            .field("terminals", &self.terminals)
            .field("limits", &self.limits)
            .finish()
    }
}
