//! Shared progress aggregate for the running job.
//!
//! Workers publish outcomes through [`Progress::record`]; observers read
//! consistent point-in-time copies through [`Progress::snapshot`]. All
//! mutation happens under one mutex and the critical sections perform no
//! network or disk I/O, so recording never stalls a worker.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal status of exactly one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    NotFound,
    NetworkError,
    Skipped,
}

/// The result recorded for one task. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub id: u64,
    pub status: OutcomeStatus,
    pub message: String,
}

impl FetchOutcome {
    pub fn new(id: u64, status: OutcomeStatus, message: impl Into<String>) -> Self {
        Self {
            id,
            status,
            message: message.into(),
        }
    }
}

/// Point-in-time copy of a job's aggregate progress.
///
/// `progress` is append-only and ordered by completion, not by task id.
/// `completed` always equals `progress.len()` in any snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub running: bool,
    pub total: usize,
    pub completed: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub progress: Vec<FetchOutcome>,
}

/// Concurrency-safe store of per-task outcomes and aggregate counters.
#[derive(Debug, Default)]
pub struct Progress {
    inner: Mutex<JobSnapshot>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the aggregate for a new job and marks it running.
    pub fn begin(&self, total: usize) {
        let mut inner = self.inner.lock().unwrap();
        *inner = JobSnapshot {
            running: true,
            total,
            completed: 0,
            started_at: Some(Utc::now()),
            finished_at: None,
            progress: Vec::new(),
        };
    }

    /// Appends one outcome and bumps the completed counter in the same
    /// critical section, so no reader ever sees one without the other.
    pub fn record(&self, outcome: FetchOutcome) {
        let mut inner = self.inner.lock().unwrap();
        inner.progress.push(outcome);
        inner.completed += 1;
    }

    /// Marks the job terminal. The aggregate stays readable until the next
    /// [`begin`](Self::begin) overwrites it.
    pub fn finish(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.running = false;
        inner.finished_at = Some(Utc::now());
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.inner.lock().unwrap().clone()
    }
}
