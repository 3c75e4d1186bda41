//! Signal semantics observed through run records.

use std::sync::Arc;

use wayline::{
    Executor, NodeError, Next, RunFailure, RunLimits, RunStatus, State, StateGraph, END,
};

use crate::common::{counter, pass, signal, state_x};

/// **Scenario**: A single node returning Halt completes with one step.
#[tokio::test]
async fn single_halt_node_completes_in_one_step() {
    let mut graph = StateGraph::new("one");
    graph.add_node("only", signal("only", Next::Halt));
    let graph = graph.compile(RunLimits::default()).unwrap();

    let record = Executor::new().run(&graph, State::new(), None).await;
    assert_eq!(record.status, RunStatus::Completed);
    assert_eq!(record.steps, 1);
    assert_eq!(record.log.len(), 1);
    assert!(record.finished_at.is_some());
}

/// **Scenario**: Repeat N times then Halt gives N+1 log entries for the same node.
#[tokio::test]
async fn repeat_then_halt_logs_n_plus_one_entries() {
    let mut graph = StateGraph::new("repeat");
    graph.add_node(
        "loop",
        Arc::new(wayline::FnNode::new("loop", |mut s, _| {
            let n = s.get_i64("n").unwrap_or(0) + 1;
            s.set("n", n);
            Ok((s, if n > 4 { Next::Halt } else { Next::Repeat }))
        })),
    );
    let graph = graph.compile(RunLimits::default()).unwrap();

    let record = Executor::new().run(&graph, State::new(), None).await;
    assert_eq!(record.status, RunStatus::Completed);
    assert_eq!(record.log.len(), 5);
    assert!(record.log.iter().all(|e| e.node == "loop"));
    assert_eq!(record.log[3].signal, Next::Repeat);
    assert_eq!(record.log[4].signal, Next::Halt);
}

/// **Scenario**: Goto(self) behaves like Repeat and counts toward the bound.
#[tokio::test]
async fn goto_self_counts_toward_limit() {
    let mut graph = StateGraph::new("self");
    graph.add_node("s", counter("s", "n", Next::goto("s")));
    let graph = graph.compile(RunLimits::new(4).unwrap()).unwrap();

    let record = Executor::new().run(&graph, State::new(), None).await;
    assert_eq!(record.status, RunStatus::LimitExceeded);
    assert_eq!(record.final_state.unwrap().get_i64("n"), Some(4));
}

/// **Scenario**: A bound of one allows exactly one invocation.
#[tokio::test]
async fn limit_of_one_allows_one_step() {
    let mut graph = StateGraph::new("g");
    graph
        .add_node("a", pass("a"))
        .add_node("b", pass("b"))
        .add_edge("a", "b")
        .add_edge("b", END);
    let graph = graph.compile(RunLimits::new(1).unwrap()).unwrap();

    let record = Executor::new().run(&graph, state_x(1), None).await;
    assert_eq!(record.status, RunStatus::LimitExceeded);
    assert_eq!(record.visited(), vec!["a"]);
}

/// **Scenario**: Node failure carries the node id and its message verbatim.
#[tokio::test]
async fn node_error_message_is_verbatim() {
    let mut graph = StateGraph::new("g");
    graph.add_node(
        "parse",
        Arc::new(wayline::FnNode::new("parse", |_, _| {
            Err(NodeError::new("unexpected token at 3:14"))
        })),
    );
    let graph = graph.compile(RunLimits::default()).unwrap();

    let record = Executor::new().run(&graph, state_x(1), None).await;
    assert_eq!(record.status, RunStatus::Failed);
    assert!(record.log.is_empty());
    assert_eq!(
        record.failure,
        Some(RunFailure::Node {
            node: "parse".into(),
            message: "unexpected token at 3:14".into()
        })
    );
    assert_eq!(record.final_state.unwrap(), state_x(1));
}

/// **Scenario**: A finished record serializes with snake_case status and tagged signals.
#[tokio::test]
async fn record_serializes_for_callers() {
    let mut graph = StateGraph::new("g");
    graph.add_node("a", signal("a", Next::Halt));
    let graph = graph.compile(RunLimits::default()).unwrap();

    let record = Executor::new().run(&graph, state_x(3), None).await;
    let v = serde_json::to_value(&record).unwrap();
    assert_eq!(v["status"], "completed");
    assert_eq!(v["log"][0]["signal"]["signal"], "halt");
    assert_eq!(v["final_state"]["x"], 3);
    assert_eq!(v["run_id"], record.run_id.to_string());
}
