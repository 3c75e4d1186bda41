//! The built-in code-review workflow over HTTP.

use serde_json::json;

use super::common::{post, spawn_server};

#[tokio::test]
async fn clean_code_passes_in_one_pass() {
    let base = spawn_server().await;
    let (status, record) = post(
        &base,
        "/workflow/code-review/run",
        &json!({"code": "def add(a, b):\n    return a + b\n"}),
    )
    .await;
    assert_eq!(status, 200, "{}", record);
    assert_eq!(record["status"], "completed");
    assert_eq!(record["steps"], 5);
    assert_eq!(record["final_state"]["passed"], true);
}

/// **Scenario**: A high threshold and no loop budget ends without passing.
#[tokio::test]
async fn unreachable_threshold_fails_review() {
    let base = spawn_server().await;
    let (status, record) = post(
        &base,
        "/workflow/code-review/run",
        &json!({"code": "x = 1", "quality_threshold": 100, "max_loop_iterations": 0}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(record["status"], "completed");
    assert_eq!(record["final_state"]["passed"], false);
}

#[tokio::test]
async fn empty_code_is_rejected() {
    let base = spawn_server().await;
    let (status, _) = post(&base, "/workflow/code-review/run", &json!({"code": "  "})).await;
    assert_eq!(status, 400);
}
