//! Shared helpers for e2e tests.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Binds a random port and spawns the server. Returns its base URL.
pub async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(serve::AppState::new(config::Settings::default()).unwrap());
    tokio::spawn(serve::run_serve_on_listener(listener, state));
    format!("http://{}", addr)
}

pub async fn get(base: &str, path: &str) -> (u16, Value) {
    let resp = reqwest::get(format!("{}{}", base, path)).await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

pub async fn post(base: &str, path: &str, body: &Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

/// a -> b -> c, all marker nodes.
pub fn linear_definition() -> Value {
    json!({
        "name": "line",
        "nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
        "edges": [{"from": "a", "to": "b"}, {"from": "b", "to": "c"}],
        "exit_nodes": ["c"]
    })
}

pub async fn create_graph(base: &str, definition: &Value) -> String {
    let (status, body) = post(base, "/graph/create", definition).await;
    assert_eq!(status, 200, "{}", body);
    body["graph_id"].as_str().unwrap().to_string()
}

/// Polls `/graph/state/{run_id}` until the run leaves pending/running.
pub async fn wait_finished(base: &str, run_id: &str) -> Value {
    for _ in 0..100 {
        let (status, record) = get(base, &format!("/graph/state/{}", run_id)).await;
        assert_eq!(status, 200);
        let s = record["status"].as_str().unwrap();
        if s != "pending" && s != "running" {
            return record;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("run {} did not finish", run_id);
}

pub fn visited(record: &Value) -> Vec<String> {
    record["log"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["node"].as_str().unwrap().to_string())
        .collect()
}
