//! Graph construction error.
//!
//! Returned by `StateGraph::compile` and `GraphDefinition::build`. Construction
//! fails fast: nothing runs until every reference resolves.

use thiserror::Error;

/// Error when compiling a graph (dangling reference, duplicate node, missing entry, ...).
///
/// `compile` collects every problem it finds; a single problem is returned as is,
/// several come back as `Multiple` in discovery order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// Two nodes were registered under the same id.
    #[error("duplicate node: {0}")]
    DuplicateNode(String),

    /// An edge or branch names a node that was never added.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No entry node was set and the graph has no nodes to default to.
    #[error("graph has no entry node")]
    MissingEntry,

    /// The entry node is not in the node set.
    #[error("entry node not found: {0}")]
    UnknownEntry(String),

    /// A declared terminal node is not in the node set.
    #[error("terminal node not found: {0}")]
    UnknownTerminal(String),

    /// A node has more than one static outgoing edge, or more than one branch.
    #[error("node has more than one outgoing edge: {0}")]
    DuplicateEdge(String),

    /// A node has both a static edge and a branch; it must have exactly one.
    #[error("node has both edge and branch: {0}")]
    NodeHasBothEdgeAndBranch(String),

    /// A branch candidate is not a node id or END.
    #[error("branch from {from} has invalid target: {target}")]
    InvalidBranchTarget { from: String, target: String },

    /// A branch was declared with no candidates.
    #[error("branch from {0} has no candidates")]
    EmptyBranch(String),

    /// A terminal node was also given an outgoing edge or branch.
    #[error("terminal node has an outgoing route: {0}")]
    TerminalHasRoute(String),

    /// Iteration bound must be greater than zero.
    #[error("max_iterations must be > 0, got {0}")]
    InvalidLimit(usize),

    /// A definition references a tool the catalog does not know.
    #[error("node {node} uses unknown tool: {tool}")]
    UnknownTool { node: String, tool: String },

    /// Several problems at once.
    #[error("{}", join(.0))]
    Multiple(Vec<CompilationError>),
}

fn join(errors: &[CompilationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CompilationError {
    /// Folds collected problems: none → `Ok`, one → that error, more → `Multiple`.
    pub(crate) fn from_issues(mut issues: Vec<CompilationError>) -> Result<(), CompilationError> {
        match issues.len() {
            0 => Ok(()),
            1 => Err(issues.remove(0)),
            _ => Err(CompilationError::Multiple(issues)),
        }
    }

    /// Every individual problem, flattening `Multiple`.
    pub fn issues(&self) -> Vec<&CompilationError> {
        match self {
            CompilationError::Multiple(all) => all.iter().flat_map(|e| e.issues()).collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of NodeNotFound contains "node not found" and the node id.
    #[test]
    fn compilation_error_display_node_not_found() {
        let err = CompilationError::NodeNotFound("x".to_string());
        let s = err.to_string();
        assert!(s.contains("node not found"), "{}", s);
        assert!(s.contains("x"), "{}", s);
    }

    /// **Scenario**: Multiple joins every problem so a caller sees all of them at once.
    #[test]
    fn compilation_error_display_multiple() {
        let err = CompilationError::Multiple(vec![
            CompilationError::DuplicateNode("a".into()),
            CompilationError::NodeNotFound("b".into()),
        ]);
        let s = err.to_string();
        assert!(s.contains("duplicate node: a"), "{}", s);
        assert!(s.contains("node not found: b"), "{}", s);
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn from_issues_folds() {
        assert!(CompilationError::from_issues(vec![]).is_ok());
        assert_eq!(
            CompilationError::from_issues(vec![CompilationError::MissingEntry]),
            Err(CompilationError::MissingEntry)
        );
        assert!(matches!(
            CompilationError::from_issues(vec![
                CompilationError::MissingEntry,
                CompilationError::InvalidLimit(0)
            ]),
            Err(CompilationError::Multiple(v)) if v.len() == 2
        ));
    }
}
