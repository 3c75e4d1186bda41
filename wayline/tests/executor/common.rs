//! Shared node helpers.

use std::sync::Arc;

use serde_json::json;
use wayline::{FnNode, Next, Node, State};

/// Node that returns the state unchanged with `Next::Continue`.
pub fn pass(id: &str) -> Arc<dyn Node> {
    Arc::new(FnNode::new(id, |s, _| Ok((s, Next::Continue))))
}

/// Node that returns the state unchanged with a fixed signal.
pub fn signal(id: &str, next: Next) -> Arc<dyn Node> {
    Arc::new(FnNode::new(id, move |s, _| Ok((s, next.clone()))))
}

/// Node that increments the integer under `key`.
pub fn counter(id: &str, key: &'static str, next: Next) -> Arc<dyn Node> {
    Arc::new(FnNode::new(id, move |mut s, _| {
        let n = s.get_i64(key).unwrap_or(0);
        s.set(key, n + 1);
        Ok((s, next.clone()))
    }))
}

pub fn state_x(x: i64) -> State {
    [("x", json!(x))].into_iter().collect()
}
