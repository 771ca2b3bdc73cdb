//! Bounded fetch worker pool.
//!
//! A fixed set of workers claims tasks from the shared cursor until the
//! range is exhausted. Each worker holds at most one request in flight, so
//! the worker count is the hard ceiling on simultaneous fetches.

pub mod http;
pub mod runner;

use std::sync::Arc;

use tracing::debug;

use crate::job::plan::TaskCursor;
use crate::job::progress::Progress;
use http::HttpClient;

/// Runs the pool to completion: every task in range has exactly one outcome
/// recorded by the time this returns.
pub async fn run_pool(cursor: Arc<TaskCursor>, client: HttpClient, progress: Arc<Progress>) {
    let total = cursor.config().total();
    let workers = cursor.config().concurrency.min(total).max(1);
    debug!(workers, total, "spawning worker pool");

    let mut handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        let cursor = Arc::clone(&cursor);
        let client = client.clone();
        let progress = Arc::clone(&progress);

        handles.push(tokio::spawn(async move {
            let skip_existing = cursor.config().skip_existing;
            while let Some(task) = cursor.claim() {
                let outcome = runner::execute(&client, &task, skip_existing).await;
                progress.record(outcome);
            }
            debug!(worker_id, "worker drained the range");
        }));
    }

    for handle in handles {
        // Task execution is infallible; a join error only occurs if the
        // runtime is shutting down.
        let _ = handle.await;
    }
}
