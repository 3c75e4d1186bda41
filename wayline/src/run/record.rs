//! Run record types: what a caller sees when polling a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RunFailure;
use crate::graph::Next;
use crate::state::State;

/// Unique run identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Lifecycle of a run: `Pending → Running → {Completed, Failed, LimitExceeded}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
    LimitExceeded,
}

impl RunStatus {
    /// True for the three final states; a finished record never changes again.
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed | RunStatus::LimitExceeded
        )
    }
}

/// One node invocation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Zero-based step index.
    pub step: usize,
    pub node: String,
    /// Deep snapshot of state right after the node ran.
    pub state: State,
    /// Signal the node returned.
    pub signal: Next,
    pub at: DateTime<Utc>,
}

/// Progress and outcome of one run.
///
/// Mutated only by the executor while running; frozen once `status` is finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: RunId,
    pub graph_name: String,
    pub status: RunStatus,
    /// Node being (or last) invoked.
    pub current_node: Option<String>,
    /// Number of successful node invocations (equals `log.len()`).
    pub steps: usize,
    pub max_iterations: usize,
    pub log: Vec<LogEntry>,
    pub initial_state: State,
    /// Final state once finished. For `Failed` this is the last state before the failing step.
    pub final_state: Option<State>,
    pub failure: Option<RunFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    pub(crate) fn new(
        run_id: RunId,
        graph_name: impl Into<String>,
        initial_state: State,
        max_iterations: usize,
    ) -> Self {
        Self {
            run_id,
            graph_name: graph_name.into(),
            status: RunStatus::Pending,
            current_node: None,
            steps: 0,
            max_iterations,
            log: Vec::new(),
            initial_state,
            final_state: None,
            failure: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Most recent state: final state if finished, else the last logged snapshot, else the initial state.
    pub fn latest_state(&self) -> &State {
        self.final_state
            .as_ref()
            .or_else(|| self.log.last().map(|e| &e.state))
            .unwrap_or(&self.initial_state)
    }

    /// Node ids in invocation order.
    pub fn visited(&self) -> Vec<&str> {
        self.log.iter().map(|e| e.node.as_str()).collect()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.run_id,
            graph_name: self.graph_name.clone(),
            status: self.status,
            steps: self.steps,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Lightweight listing entry for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub graph_name: String,
    pub status: RunStatus,
    pub steps: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}
