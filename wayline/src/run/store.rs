//! Run store: the only structure shared across runs.
//!
//! Maps run id to its record. Each record sits behind its own `RwLock`; the
//! executor appends a log entry and bumps the step counter under one write lock,
//! and readers clone under the read lock, so a poll never sees a half-written step.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use dashmap::DashMap;

use crate::error::RunFailure;
use crate::state::State;

use super::record::{LogEntry, RunId, RunRecord, RunStatus, RunSummary};

type SharedRecord = Arc<RwLock<RunRecord>>;

fn read(record: &SharedRecord) -> RwLockReadGuard<'_, RunRecord> {
    record.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write(record: &SharedRecord) -> RwLockWriteGuard<'_, RunRecord> {
    record.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Concurrent lookup table of run records, retained until the process exits.
#[derive(Default)]
pub struct RunStore {
    runs: DashMap<RunId, SharedRecord>,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new record and returns the executor's write handle for it.
    pub(crate) fn register(&self, record: RunRecord) -> RunHandle {
        let run_id = record.run_id;
        let shared = Arc::new(RwLock::new(record));
        self.runs.insert(run_id, shared.clone());
        RunHandle {
            run_id,
            record: shared,
        }
    }

    /// Consistent snapshot of the record, or `None` for an unknown id.
    pub fn get(&self, run_id: &RunId) -> Option<RunRecord> {
        let shared = self.runs.get(run_id)?.value().clone();
        let snapshot = read(&shared).clone();
        Some(snapshot)
    }

    pub fn status(&self, run_id: &RunId) -> Option<RunStatus> {
        let shared = self.runs.get(run_id)?.value().clone();
        let status = read(&shared).status;
        Some(status)
    }

    /// Summaries of every run, oldest first.
    pub fn list(&self) -> Vec<RunSummary> {
        let shared: Vec<SharedRecord> = self.runs.iter().map(|e| e.value().clone()).collect();
        let mut out: Vec<RunSummary> = shared.iter().map(|r| read(r).summary()).collect();
        out.sort_by_key(|s| s.started_at);
        out
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Marks a run `Failed` if it has not finished yet. Used when the task driving
    /// the run died without finalizing it (e.g. a node panicked).
    pub(crate) fn abort(&self, run_id: &RunId, message: impl Into<String>) {
        if let Some(shared) = self.runs.get(run_id).map(|e| e.value().clone()) {
            abort(&shared, message.into());
        }
    }
}

/// Fails an unfinished record in place and returns a copy; finished records are left alone.
fn abort(shared: &SharedRecord, message: String) -> RunRecord {
    let mut record = write(shared);
    if !record.status.is_finished() {
        record.final_state = Some(record.latest_state().clone());
        record.failure = Some(RunFailure::Aborted { message });
        record.status = RunStatus::Failed;
        record.finished_at = Some(Utc::now());
    }
    record.clone()
}

/// Second reference to a run's record that outlives its [`RunHandle`], so the
/// caller can still fail the run if the future owning the handle unwinds.
pub(crate) struct AbortHandle {
    record: SharedRecord,
}

impl AbortHandle {
    pub(crate) fn abort(self, message: impl Into<String>) -> RunRecord {
        abort(&self.record, message.into())
    }
}

/// Executor-side handle for one run's record.
///
/// `finish` consumes the handle, so a finalized record has no mutation path left.
pub(crate) struct RunHandle {
    run_id: RunId,
    record: SharedRecord,
}

impl RunHandle {
    pub(crate) fn run_id(&self) -> RunId {
        self.run_id
    }

    pub(crate) fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            record: self.record.clone(),
        }
    }

    pub(crate) fn begin(&self, entry: &str) {
        let mut record = write(&self.record);
        record.status = RunStatus::Running;
        record.current_node = Some(entry.to_string());
    }

    /// Appends one log entry and bumps the step counter atomically.
    pub(crate) fn record_step(&self, entry: LogEntry) {
        let mut record = write(&self.record);
        record.log.push(entry);
        record.steps = record.log.len();
    }

    pub(crate) fn advance(&self, next: &str) {
        write(&self.record).current_node = Some(next.to_string());
    }

    /// Finalizes the record and returns a copy of it.
    ///
    /// `final_state` of `None` keeps the last logged state (used for failures,
    /// where the state moved into the failing node is gone).
    pub(crate) fn finish(
        self,
        status: RunStatus,
        failure: Option<RunFailure>,
        final_state: Option<State>,
    ) -> RunRecord {
        let mut record = write(&self.record);
        let final_state = final_state.unwrap_or_else(|| record.latest_state().clone());
        record.final_state = Some(final_state);
        record.failure = failure;
        record.status = status;
        record.finished_at = Some(Utc::now());
        record.clone()
    }
}
