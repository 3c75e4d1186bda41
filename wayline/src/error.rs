//! Run-time error types.
//!
//! `NodeError` is returned by `Node::run`; `RoutingError` by edge-table resolution.
//! Neither escapes the executor: both end the run as `Failed` and are kept in the
//! run record as a [`RunFailure`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Node-level failure signalled by a node's own computation.
///
/// The message is preserved verbatim in the run record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct NodeError {
    message: String,
}

impl NodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure to pick the next node at run time.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoutingError {
    /// `Next::Goto` named a node the graph does not define.
    #[error("unknown node: {node}")]
    UnknownNode { node: String },

    /// A branch router returned a name outside its declared candidates.
    #[error("branch at {from} chose {chosen:?}, expected one of {candidates:?}")]
    OutsideCandidates {
        from: String,
        chosen: String,
        candidates: Vec<String>,
    },
}

/// Why a run ended as `Failed`. Stored in the run record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunFailure {
    /// The node's computation failed; `message` is the node's own detail.
    Node { node: String, message: String },
    /// Routing after `node` failed.
    Routing { node: String, error: RoutingError },
    /// The task driving the run died before finalizing it.
    Aborted { message: String },
}

impl std::fmt::Display for RunFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunFailure::Node { node, message } => write!(f, "node {} failed: {}", node, message),
            RunFailure::Routing { node, error } => {
                write!(f, "routing after {} failed: {}", node, error)
            }
            RunFailure::Aborted { message } => write!(f, "run aborted: {}", message),
        }
    }
}
