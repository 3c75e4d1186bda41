//! Background runs read through the shared run store.

use std::sync::Arc;
use std::time::Duration;

use wayline::{Executor, Next, RunId, RunLimits, RunRecord, RunStatus, StateGraph};

use crate::common::counter;

async fn wait_finished(exec: &Executor, id: &RunId) -> RunRecord {
    for _ in 0..500 {
        let record = exec.get(id).expect("run is registered");
        if record.status.is_finished() {
            return record;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("run {} did not finish", id);
}

/// **Scenario**: Unknown run ids are reported as absent, not as errors.
#[tokio::test]
async fn unknown_run_is_none() {
    assert!(Executor::new().get(&RunId::new()).is_none());
}

/// **Scenario**: Many concurrent runs and readers; every snapshot is consistent and
/// every run finishes with its own state.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_and_readers() {
    let mut graph = StateGraph::new("count");
    graph.add_node("c", counter("c", "n", Next::Repeat));
    let graph = Arc::new(graph.compile(RunLimits::new(50).unwrap()).unwrap());

    let exec = Executor::new();
    let ids: Vec<RunId> = (0..8)
        .map(|i| {
            let mut state = wayline::State::new();
            state.set("run", i);
            exec.start(graph.clone(), state, None)
        })
        .collect();

    let readers: Vec<_> = ids
        .iter()
        .map(|id| {
            let exec = exec.clone();
            let id = *id;
            tokio::spawn(async move {
                loop {
                    let r = exec.get(&id).expect("registered");
                    assert_eq!(r.steps, r.log.len());
                    for (i, e) in r.log.iter().enumerate() {
                        assert_eq!(e.state.get_i64("n"), Some(i as i64 + 1));
                    }
                    if r.status.is_finished() {
                        break;
                    }
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();
    for reader in readers {
        reader.await.unwrap();
    }

    for (i, id) in ids.iter().enumerate() {
        let record = wait_finished(&exec, id).await;
        assert_eq!(record.status, RunStatus::LimitExceeded);
        let state = record.final_state.unwrap();
        assert_eq!(state.get_i64("n"), Some(50));
        assert_eq!(state.get_i64("run"), Some(i as i64));
    }
    assert_eq!(exec.list().len(), 8);
}
