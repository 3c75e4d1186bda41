//! Graph creation, runs and polling.

use serde_json::json;

use super::common::{create_graph, get, linear_definition, post, spawn_server, visited, wait_finished};

#[tokio::test]
async fn index_describes_service() {
    let base = spawn_server().await;
    let (status, body) = get(&base, "/").await;
    assert_eq!(status, 200);
    assert_eq!(body["service"], "wayline");
    assert!(body["endpoints"].as_array().unwrap().len() >= 7);
}

#[tokio::test]
async fn tools_lists_builtin_catalog() {
    let base = spawn_server().await;
    let (status, body) = get(&base, "/tools").await;
    assert_eq!(status, 200);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["check_complexity", "detect_smells", "extract_functions", "suggest_improvements"]
    );
}

/// **Scenario**: Create a graph, run it with `wait`, get the finished record back.
#[tokio::test]
async fn create_and_run_waiting() {
    let base = spawn_server().await;
    let graph_id = create_graph(&base, &linear_definition()).await;

    let (status, record) = post(
        &base,
        "/graph/run",
        &json!({"graph_id": graph_id, "initial_state": {"input": "hi"}}),
    )
    .await;
    assert_eq!(status, 200, "{}", record);
    assert_eq!(record["status"], "completed");
    assert_eq!(record["steps"], 3);
    assert_eq!(visited(&record), vec!["a", "b", "c"]);
    assert_eq!(record["final_state"]["input"], "hi");
    assert_eq!(record["final_state"]["b_executed"], true);
}

/// **Scenario**: `wait: false` returns a run id at once; polling reaches the final record.
#[tokio::test]
async fn background_run_is_pollable() {
    let base = spawn_server().await;
    let graph_id = create_graph(&base, &linear_definition()).await;

    let (status, started) = post(
        &base,
        "/graph/run",
        &json!({"graph_id": graph_id, "wait": false}),
    )
    .await;
    assert_eq!(status, 200, "{}", started);
    let run_id = started["run_id"].as_str().unwrap().to_string();

    let record = wait_finished(&base, &run_id).await;
    assert_eq!(record["status"], "completed");
    assert_eq!(record["run_id"], run_id.as_str());

    let (_, runs) = get(&base, "/runs").await;
    assert!(runs
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["run_id"] == run_id.as_str()));
}

#[tokio::test]
async fn per_run_limit_override() {
    let base = spawn_server().await;
    let graph_id = create_graph(&base, &linear_definition()).await;
    let (status, record) = post(
        &base,
        "/graph/run",
        &json!({"graph_id": graph_id, "max_iterations": 2}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(record["status"], "limit_exceeded");
    assert_eq!(record["steps"], 2);
}

#[tokio::test]
async fn list_includes_builtin_and_created_graphs() {
    let base = spawn_server().await;
    let graph_id = create_graph(&base, &linear_definition()).await;
    let (status, body) = get(&base, "/graph/list").await;
    assert_eq!(status, 200);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["graph_id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"code-review"));
    assert!(ids.contains(&graph_id.as_str()));
}

/// **Scenario**: A branch on a tool result routes the run in a created graph.
#[tokio::test]
async fn tool_graph_branches_on_score() {
    let base = spawn_server().await;
    let definition: serde_json::Value =
        serde_json::from_str(include_str!("../../../wayline/tests/fixtures/double_when_large.json"))
            .unwrap();
    let graph_id = create_graph(&base, &definition).await;

    let (_, simple) = post(
        &base,
        "/graph/run",
        &json!({"graph_id": graph_id, "initial_state": {"code": "x = 1"}}),
    )
    .await;
    assert_eq!(visited(&simple), vec!["start", "check", "simple"]);

    let (_, complex) = post(
        &base,
        "/graph/run",
        &json!({"graph_id": graph_id, "initial_state": {"code": "if a:\n    if b:\n        pass"}}),
    )
    .await;
    assert_eq!(visited(&complex), vec!["start", "check", "complex"]);
}
