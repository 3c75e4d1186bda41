//! Declarative graph definitions (JSON).
//!
//! A [`GraphDefinition`] names nodes, static edges, value branches, the entry node
//! and exit nodes. `build` turns it into a [`CompiledGraph`]: nodes with a `tool`
//! become [`ToolNode`]s, nodes without one become [`MarkerNode`]s.
//!
//! ```json
//! {
//!   "name": "triage",
//!   "nodes": [{"id": "classify", "tool": "check_complexity"}, {"id": "simple"}, {"id": "complex"}],
//!   "edges": [{"from": "simple", "to": "__end__"}],
//!   "branches": [{"from": "classify", "key": "verdict", "routes": {"ok": "simple"}, "default": "complex"}],
//!   "exit_nodes": ["complex"]
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::{
    CompilationError, CompiledGraph, MarkerNode, Node, RunLimits, StateGraph, DEFAULT_MAX_ITERATIONS,
};
use crate::state::State;
use crate::tools::{ToolNode, ToolRegistry};

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Registry tool to call; `None` makes a marker node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDefinition {
    pub from: String,
    /// Node id or `"__end__"`.
    pub to: String,
}

/// Routes on the string value of `key` in state.
///
/// Non-string values are matched by their JSON text (`true`, `3`). A missing key
/// or unmatched value goes to `default`; without a default it is a routing error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchDefinition {
    pub from: String,
    pub key: String,
    pub routes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl BranchDefinition {
    fn candidates(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for target in self.routes.values().chain(self.default.iter()) {
            if !out.contains(target) {
                out.push(target.clone());
            }
        }
        out
    }

    fn choose(&self, state: &State) -> String {
        let value = match state.get(&self.key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        value
            .as_ref()
            .and_then(|v| self.routes.get(v))
            .or(self.default.as_ref())
            .cloned()
            .unwrap_or_else(|| format!("<{}={}>", self.key, value.unwrap_or_default()))
    }
}

/// A whole graph as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDefinition {
    #[serde(default)]
    pub name: String,
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub edges: Vec<EdgeDefinition>,
    #[serde(default)]
    pub branches: Vec<BranchDefinition>,
    /// Defaults to the first node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_node: Option<String>,
    #[serde(default)]
    pub exit_nodes: Vec<String>,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl GraphDefinition {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Validates and compiles the definition.
    ///
    /// Every problem is reported at once: unknown tools together with everything
    /// `StateGraph::compile` finds.
    pub fn build(&self, tools: &ToolRegistry) -> Result<CompiledGraph, CompilationError> {
        let mut issues = Vec::new();

        let limits = match RunLimits::new(self.max_iterations) {
            Ok(limits) => limits,
            Err(e) => {
                issues.push(e);
                RunLimits::default()
            }
        };

        let name = if self.name.is_empty() {
            "unnamed"
        } else {
            self.name.as_str()
        };
        let mut graph = StateGraph::new(name);

        for node in &self.nodes {
            let built: Arc<dyn Node> = match &node.tool {
                Some(tool) => match tools.get(tool) {
                    Ok(t) => Arc::new(ToolNode::new(node.id.clone(), t)),
                    Err(_) => {
                        issues.push(CompilationError::UnknownTool {
                            node: node.id.clone(),
                            tool: tool.clone(),
                        });
                        continue;
                    }
                },
                None => Arc::new(MarkerNode::new(node.id.clone())),
            };
            graph.add_node(node.id.clone(), built);
        }
        for edge in &self.edges {
            graph.add_edge(edge.from.clone(), edge.to.clone());
        }
        for branch in &self.branches {
            let rule = branch.clone();
            graph.add_branch(
                branch.from.clone(),
                Arc::new(move |s: &State| rule.choose(s)),
                branch.candidates(),
            );
        }
        if let Some(entry) = &self.entry_node {
            graph.set_entry(entry.clone());
        }
        for exit in &self.exit_nodes {
            graph.add_terminal(exit.clone());
        }

        match graph.compile(limits) {
            Ok(compiled) => CompilationError::from_issues(issues).map(|()| compiled),
            Err(e) => {
                // A node dropped for its unknown tool shows up again as a dangling reference.
                let dropped: Vec<String> = issues
                    .iter()
                    .filter_map(|i| match i {
                        CompilationError::UnknownTool { node, .. } => Some(node.clone()),
                        _ => None,
                    })
                    .collect();
                issues.extend(e.issues().into_iter().cloned().filter(|i| {
                    !matches!(i, CompilationError::NodeNotFound(id)
                        | CompilationError::UnknownEntry(id)
                        | CompilationError::UnknownTerminal(id) if dropped.contains(id))
                        && !matches!(i, CompilationError::MissingEntry if !dropped.is_empty())
                }));
                match CompilationError::from_issues(issues) {
                    Err(e) => Err(e),
                    Ok(()) => Err(e),
                }
            }
        }
    }
}
