//! Run records and the store that holds them.
//!
//! A [`RunRecord`] is created when a run starts, updated by the executor after each
//! step and frozen once the run finishes. [`RunStore`] maps run ids to records and
//! is safe to read from any number of tasks while runs are in progress.

mod record;
mod store;

pub use record::{LogEntry, RunId, RunRecord, RunStatus, RunSummary};
pub(crate) use store::RunHandle;
pub use store::RunStore;
