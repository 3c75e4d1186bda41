//! Error responses: JSON `{ "error": ... }` with 400 or 404.

use serde_json::json;

use super::common::{get, post, spawn_server};

/// **Scenario**: Every construction problem is reported, not only the first.
#[tokio::test]
async fn invalid_definition_lists_issues() {
    let base = spawn_server().await;
    let (status, body) = post(
        &base,
        "/graph/create",
        &json!({
            "nodes": [{"id": "a"}, {"id": "t", "tool": "nope"}],
            "edges": [{"from": "a", "to": "ghost"}],
            "max_iterations": 0
        }),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().starts_with("invalid graph"));
    assert_eq!(body["issues"].as_array().unwrap().len(), 3, "{}", body);
}

#[tokio::test]
async fn unknown_graph_is_404() {
    let base = spawn_server().await;
    let (status, body) = post(&base, "/graph/run", &json!({"graph_id": "missing"})).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "graph not found: missing");
}

#[tokio::test]
async fn zero_run_limit_is_rejected() {
    let base = spawn_server().await;
    let (status, _) = post(
        &base,
        "/graph/run",
        &json!({"graph_id": "code-review", "max_iterations": 0}),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn run_lookup_errors() {
    let base = spawn_server().await;
    let (status, _) = get(&base, "/graph/state/not-a-uuid").await;
    assert_eq!(status, 400);
    let (status, body) = get(&base, "/graph/state/00000000-0000-4000-8000-000000000000").await;
    assert_eq!(status, 404);
    assert!(body["error"].as_str().unwrap().starts_with("run not found"));
}

#[tokio::test]
async fn malformed_json_is_400() {
    let base = spawn_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/graph/create", base))
        .header("content-type", "application/json")
        .body("{")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("invalid request"));
}
