//! State graph builder: nodes, edges, branches, entry and terminals.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` (use `START` and
//! `END` for entry/exit), route on state with `add_branch`, then `compile` with the
//! run bound to get an immutable [`CompiledGraph`].
//!
//! # Routing
//!
//! A node has at most one static edge or one branch. A node with neither is
//! terminal. A node's own `Next` signal (`Goto`, `Repeat`, `Halt`) always wins over
//! the edge table for that step.
//!
//! # Entry
//!
//! `add_edge(START, id)` or `set_entry(id)` picks the entry node; when neither is
//! used the first node added is the entry.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use super::branch::{BranchFn, BranchRouter};
use super::compile_error::CompilationError;
use super::compiled::CompiledGraph;
use super::edge::{Edge, EdgeTable};
use super::limits::RunLimits;
use super::node::Node;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)` or as a branch candidate.
pub const END: &str = "__end__";

/// Graph under construction.
///
/// Duplicate ids and dangling references are not rejected while building; `compile`
/// reports all of them together.
///
/// **Interaction**: Accepts `Arc<dyn Node>`; produces `CompiledGraph`, which the
/// `Executor` runs.
pub struct StateGraph {
    name: String,
    /// Nodes in insertion order; duplicates are kept so compile can report them.
    nodes: Vec<(String, Arc<dyn Node>)>,
    /// Static edges (from_id, to_id), START/END included.
    edges: Vec<(String, String)>,
    /// Branches: source node id -> router. Last call per source wins.
    branches: Vec<(String, BranchRouter)>,
    entry: Option<String>,
    terminals: Vec<String>,
}

impl StateGraph {
    /// Creates an empty graph with a display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            branches: Vec::new(),
            entry: None,
            terminals: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a node under `id`. Returns `&mut Self` for chaining.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node>) -> &mut Self {
        self.nodes.push((id.into(), node));
        self
    }

    /// Adds a static edge. `START` as `from_id` sets the entry; `END` as `to_id` marks `from_id` terminal.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Adds a branch from `source`: after it runs with `Next::Continue`, `path(state)`
    /// picks the next node, which must be one of `candidates` (node ids or `END`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use wayline::{MarkerNode, RunLimits, State, StateGraph, END};
    ///
    /// let mut graph = StateGraph::new("gate");
    /// graph
    ///     .add_node("check", Arc::new(MarkerNode::new("check")))
    ///     .add_node("double", Arc::new(MarkerNode::new("double")))
    ///     .add_edge("double", END)
    ///     .add_branch(
    ///         "check",
    ///         Arc::new(|s: &State| {
    ///             if s.get_i64("x").unwrap_or(0) > 10 { "double".to_string() } else { END.to_string() }
    ///         }),
    ///         ["double", END],
    ///     );
    /// let compiled = graph.compile(RunLimits::default()).unwrap();
    /// assert_eq!(compiled.entry(), "check");
    /// ```
    pub fn add_branch<I, C>(&mut self, source: impl Into<String>, path: BranchFn, candidates: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let candidates = candidates.into_iter().map(Into::into).collect();
        self.branches
            .push((source.into(), BranchRouter::new(path, candidates)));
        self
    }

    /// Sets the entry node explicitly.
    pub fn set_entry(&mut self, id: impl Into<String>) -> &mut Self {
        self.entry = Some(id.into());
        self
    }

    /// Declares a terminal node: the run completes after it when it returns `Next::Continue`.
    pub fn add_terminal(&mut self, id: impl Into<String>) -> &mut Self {
        self.terminals.push(id.into());
        self
    }

    /// Validates the graph and freezes it with the given run bound.
    ///
    /// Checks duplicate node ids, dangling edge/branch/terminal references, the
    /// entry node and conflicting routes per node (two edges, two branches, or an
    /// edge and a branch from one source). Every problem found is reported (see
    /// [`CompilationError::Multiple`]).
    pub fn compile(self, limits: RunLimits) -> Result<CompiledGraph, CompilationError> {
        let mut issues = Vec::new();

        let mut nodes: HashMap<String, Arc<dyn Node>> = HashMap::new();
        let mut node_order = Vec::new();
        for (id, node) in self.nodes {
            if nodes.contains_key(&id) {
                issues.push(CompilationError::DuplicateNode(id));
                continue;
            }
            node_order.push(id.clone());
            nodes.insert(id, node);
        }

        let mut start_entry: Option<String> = None;
        let mut entries: HashMap<String, Edge> = HashMap::new();
        let mut edge_froms = HashSet::new();
        for (from, to) in self.edges {
            if from == START {
                if start_entry.is_some() {
                    issues.push(CompilationError::DuplicateEdge(START.to_string()));
                    continue;
                }
                start_entry = Some(to);
                continue;
            }
            if !nodes.contains_key(&from) {
                issues.push(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !nodes.contains_key(&to) {
                issues.push(CompilationError::NodeNotFound(to.clone()));
            }
            if !edge_froms.insert(from.clone()) {
                issues.push(CompilationError::DuplicateEdge(from));
                continue;
            }
            let edge = if to == END { Edge::End } else { Edge::To(to) };
            entries.insert(from, edge);
        }

        let mut branch_froms = HashSet::new();
        for (source, router) in self.branches {
            if !nodes.contains_key(&source) {
                issues.push(CompilationError::NodeNotFound(source.clone()));
            }
            if edge_froms.contains(&source) {
                issues.push(CompilationError::NodeHasBothEdgeAndBranch(source.clone()));
                continue;
            }
            if !branch_froms.insert(source.clone()) {
                issues.push(CompilationError::DuplicateEdge(source));
                continue;
            }
            if router.candidates().is_empty() {
                issues.push(CompilationError::EmptyBranch(source.clone()));
            }
            for target in router.candidates() {
                if target != END && !nodes.contains_key(target) {
                    issues.push(CompilationError::InvalidBranchTarget {
                        from: source.clone(),
                        target: target.clone(),
                    });
                }
            }
            entries.insert(source, Edge::Branch(router));
        }

        let entry = match self.entry.or(start_entry).or_else(|| node_order.first().cloned()) {
            Some(id) if nodes.contains_key(&id) => Some(id),
            Some(id) => {
                issues.push(CompilationError::UnknownEntry(id));
                None
            }
            None => {
                issues.push(CompilationError::MissingEntry);
                None
            }
        };

        let mut terminals = BTreeSet::new();
        for id in self.terminals {
            if !nodes.contains_key(&id) {
                issues.push(CompilationError::UnknownTerminal(id));
                continue;
            }
            match entries.get(&id) {
                Some(Edge::To(_)) | Some(Edge::Branch(_)) => {
                    issues.push(CompilationError::TerminalHasRoute(id));
                    continue;
                }
                _ => {}
            }
            terminals.insert(id);
        }

        CompilationError::from_issues(issues)?;
        let Some(entry) = entry else {
            return Err(CompilationError::MissingEntry);
        };

        for id in &terminals {
            entries.insert(id.clone(), Edge::End);
        }
        let edges = EdgeTable::new(entries);
        terminals.extend(node_order.iter().filter(|id| edges.is_terminal(id)).cloned());

        Ok(CompiledGraph {
            name: self.name,
            nodes,
            node_order,
            edges,
            entry,
            terminals,
            limits,
        })
    }
}
