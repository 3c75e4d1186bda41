//! Construction errors: every dangling reference is rejected before anything runs.

use std::sync::Arc;

use wayline::{CompilationError, RunLimits, State, StateGraph, END, START};

use crate::common::pass;

/// **Scenario**: An edge to an unregistered node is rejected with NodeNotFound.
#[test]
fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::new("g");
    graph.add_node("a", pass("a")).add_edge("a", "missing");

    match graph.compile(RunLimits::default()) {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

/// **Scenario**: A graph with no nodes has no entry.
#[test]
fn compile_fails_on_empty_graph() {
    let graph = StateGraph::new("empty");
    assert_eq!(
        graph.compile(RunLimits::default()).unwrap_err(),
        CompilationError::MissingEntry
    );
}

/// **Scenario**: An entry set via START that does not exist is rejected.
#[test]
fn compile_fails_on_unknown_entry() {
    let mut graph = StateGraph::new("g");
    graph.add_node("a", pass("a")).add_edge(START, "nowhere");
    assert_eq!(
        graph.compile(RunLimits::default()).unwrap_err(),
        CompilationError::UnknownEntry("nowhere".into())
    );
}

/// **Scenario**: Branch candidates must be nodes (or END).
#[test]
fn compile_fails_on_invalid_branch_target() {
    let mut graph = StateGraph::new("g");
    graph.add_node("a", pass("a")).add_branch(
        "a",
        Arc::new(|_: &State| END.to_string()),
        ["ghost", END],
    );
    assert_eq!(
        graph.compile(RunLimits::default()).unwrap_err(),
        CompilationError::InvalidBranchTarget {
            from: "a".into(),
            target: "ghost".into()
        }
    );
}

/// **Scenario**: A second branch from the same node is rejected, not silently replacing the first.
#[test]
fn compile_fails_on_second_branch_from_same_node() {
    let mut graph = StateGraph::new("g");
    graph
        .add_node("a", pass("a"))
        .add_node("b", pass("b"))
        .add_branch("a", Arc::new(|_: &State| "b".to_string()), ["b"])
        .add_branch("a", Arc::new(|_: &State| END.to_string()), [END]);
    assert_eq!(
        graph.compile(RunLimits::default()).unwrap_err(),
        CompilationError::DuplicateEdge("a".into())
    );
}

/// **Scenario**: Several problems come back together.
#[test]
fn compile_reports_all_problems() {
    let mut graph = StateGraph::new("g");
    graph
        .add_node("a", pass("a"))
        .add_node("a", pass("a"))
        .add_edge("a", "b")
        .add_terminal("c");
    let err = graph.compile(RunLimits::default()).unwrap_err();
    let issues = err.issues();
    assert_eq!(issues.len(), 3, "{}", err);
    assert!(issues.contains(&&CompilationError::DuplicateNode("a".into())));
    assert!(issues.contains(&&CompilationError::NodeNotFound("b".into())));
    assert!(issues.contains(&&CompilationError::UnknownTerminal("c".into())));
}

/// **Scenario**: A zero bound cannot be built, so no compiled graph ever carries one.
#[test]
fn zero_limit_is_rejected() {
    assert_eq!(RunLimits::new(0), Err(CompilationError::InvalidLimit(0)));
    assert!(serde_json::from_str::<RunLimits>("0").is_err());
    let mut graph = StateGraph::new("g");
    graph.add_node("a", pass("a"));
    let limits = RunLimits::new(1).unwrap();
    assert_eq!(graph.compile(limits).unwrap().limits().max_iterations(), 1);
}
