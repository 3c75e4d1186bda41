//! Executor: drives one run of a compiled graph and records it in the run store.
//!
//! Runs are sequential inside themselves: one node at a time, the next node
//! starting only after the previous one returned. Different runs are independent
//! and may proceed concurrently (`start` spawns each on the tokio runtime).

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;

use crate::error::{RoutingError, RunFailure};
use crate::run::{LogEntry, RunHandle, RunId, RunRecord, RunStatus, RunStore, RunSummary};
use crate::state::State;

use super::logging::{
    log_node_complete, log_node_start, log_route, log_run_failed, log_run_finish, log_run_start,
};
use super::{CompiledGraph, Next, Route, RunContext, RunLimits};

/// Runs compiled graphs and keeps their records.
///
/// Cloning is cheap; clones share the same [`RunStore`].
#[derive(Clone, Default)]
pub struct Executor {
    store: Arc<RunStore>,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor backed by an existing store (e.g. one shared with an HTTP layer).
    pub fn with_store(store: Arc<RunStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<RunStore> {
        &self.store
    }

    /// Runs `graph` to completion and returns the finished record.
    ///
    /// `limits` overrides the bound chosen at compile time for this run only.
    /// Node failures and routing errors do not surface as `Err`: they end the run
    /// as `Failed` and are described in `RunRecord::failure`. A panicking node
    /// ends it as `Failed` with `RunFailure::Aborted`.
    pub async fn run(
        &self,
        graph: &CompiledGraph,
        state: State,
        limits: Option<RunLimits>,
    ) -> RunRecord {
        let limits = limits.unwrap_or(graph.limits());
        let handle = self.store.register(RunRecord::new(
            RunId::new(),
            graph.name(),
            state.clone(),
            limits.max_iterations(),
        ));
        let run_id = handle.run_id();
        let aborter = handle.abort_handle();
        match AssertUnwindSafe(drive(graph, state, limits, handle))
            .catch_unwind()
            .await
        {
            Ok(record) => record,
            Err(payload) => {
                let message = format!("node panicked: {}", panic_message(payload.as_ref()));
                tracing::error!(%run_id, error = %message, "run aborted");
                aborter.abort(message)
            }
        }
    }

    /// Starts a run in the background and returns its id immediately.
    ///
    /// Poll progress with [`Executor::get`]. Must be called inside a tokio runtime.
    /// If the run's task dies (a node panicked), the record is marked `Failed`.
    pub fn start(
        &self,
        graph: Arc<CompiledGraph>,
        state: State,
        limits: Option<RunLimits>,
    ) -> RunId {
        let limits = limits.unwrap_or(graph.limits());
        let run_id = RunId::new();
        let handle = self.store.register(RunRecord::new(
            run_id,
            graph.name(),
            state.clone(),
            limits.max_iterations(),
        ));
        let store = self.store.clone();
        tokio::spawn(async move {
            let task = tokio::spawn(async move { drive(&graph, state, limits, handle).await });
            if let Err(e) = task.await {
                tracing::error!(%run_id, error = %e, "run task aborted");
                store.abort(&run_id, e.to_string());
            }
        });
        run_id
    }

    /// Consistent snapshot of a run, or `None` for an unknown id.
    pub fn get(&self, run_id: &RunId) -> Option<RunRecord> {
        self.store.get(run_id)
    }

    pub fn list(&self) -> Vec<RunSummary> {
        self.store.list()
    }
}

/// The run loop.
///
/// Bound check, invoke, log, route. The step counter counts successful
/// invocations and always equals the log length.
async fn drive(
    graph: &CompiledGraph,
    mut state: State,
    limits: RunLimits,
    handle: RunHandle,
) -> RunRecord {
    let run_id = handle.run_id();
    let mut current = graph.entry().to_string();
    let mut step = 0usize;

    log_run_start(&run_id, graph.name(), &current, limits.max_iterations());
    handle.begin(&current);

    loop {
        if step >= limits.max_iterations() {
            log_run_finish(&run_id, RunStatus::LimitExceeded, step);
            return handle.finish(RunStatus::LimitExceeded, None, Some(state));
        }

        let Some(node) = graph.node(&current).cloned() else {
            return fail(
                handle,
                RunFailure::Routing {
                    node: current.clone(),
                    error: RoutingError::UnknownNode { node: current },
                },
                step,
            );
        };

        let ctx = RunContext {
            run_id,
            graph_name: graph.name().to_string(),
            node_id: current.clone(),
            step,
            max_iterations: limits.max_iterations(),
        };
        log_node_start(&run_id, &current, step);
        let (next_state, next) = match node.run(state, &ctx).await {
            Ok(out) => out,
            Err(e) => {
                let failure = RunFailure::Node {
                    node: current,
                    message: e.message().to_string(),
                };
                return fail(handle, failure, step);
            }
        };
        log_node_complete(&run_id, &current, step, &next);
        state = next_state;

        handle.record_step(LogEntry {
            step,
            node: current.clone(),
            state: state.snapshot(),
            signal: next.clone(),
            at: Utc::now(),
        });
        step += 1;

        let target = match next {
            Next::Halt => None,
            Next::Repeat => Some(current.clone()),
            Next::Goto(id) => {
                if !graph.contains(&id) {
                    let failure = RunFailure::Routing {
                        node: current,
                        error: RoutingError::UnknownNode { node: id },
                    };
                    return fail(handle, failure, step);
                }
                Some(id)
            }
            Next::Continue => match graph.edges().resolve(&current, &state) {
                Ok(Route::End) => None,
                Ok(Route::Node(id)) => Some(id),
                Err(error) => {
                    let failure = RunFailure::Routing {
                        node: current,
                        error,
                    };
                    return fail(handle, failure, step);
                }
            },
        };

        let Some(target) = target else {
            log_run_finish(&run_id, RunStatus::Completed, step);
            return handle.finish(RunStatus::Completed, None, Some(state));
        };
        log_route(&run_id, &current, &target);
        handle.advance(&target);
        current = target;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

fn fail(handle: RunHandle, failure: RunFailure, step: usize) -> RunRecord {
    log_run_failed(&handle.run_id(), &failure, step);
    handle.finish(RunStatus::Failed, Some(failure), None)
}
