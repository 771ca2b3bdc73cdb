//! Job controller: the single-slot state machine that owns the progress
//! aggregate and launches the worker pool.
//!
//! At most one job runs at a time. `submit` is non-blocking: it validates,
//! reserves the slot, spawns the pool in the background, and returns the
//! task count; callers poll `status` until `running` turns false.

pub mod plan;
pub mod progress;

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::FetchConfig;
use crate::worker;
use crate::worker::http::{FetchError, HttpClient, HttpConfig};
use plan::{JobConfig, JobConfigError, TaskCursor};
use progress::{JobSnapshot, Progress};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("a download job is already active")]
    JobAlreadyActive,

    #[error("invalid job config: {0}")]
    InvalidConfig(#[from] JobConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Idle,
    Running,
}

pub struct JobController {
    slot: Arc<Mutex<Slot>>,
    progress: Arc<Progress>,
    client: HttpClient,
}

impl JobController {
    pub fn new(fetch: &FetchConfig) -> Result<Self, FetchError> {
        let client = HttpClient::new(&HttpConfig::from(fetch))?;
        Ok(Self {
            slot: Arc::new(Mutex::new(Slot::Idle)),
            progress: Arc::new(Progress::new()),
            client,
        })
    }

    /// Validates the config and, if the slot is idle, starts the job.
    ///
    /// The whole transition happens under the slot lock so two concurrent
    /// submits cannot both observe `Idle`. An active job or an invalid
    /// config leaves all state untouched.
    pub fn submit(&self, config: JobConfig) -> Result<usize, SubmitError> {
        let mut slot = self.slot.lock().unwrap();
        if *slot == Slot::Running {
            warn!("rejecting submission, a job is already active");
            return Err(SubmitError::JobAlreadyActive);
        }

        config.validate()?;
        std::fs::create_dir_all(&config.destination).map_err(|source| {
            JobConfigError::Destination {
                path: config.destination.clone(),
                source,
            }
        })?;

        let total = config.total();
        info!(
            start = config.range_start,
            end = config.range_end,
            total,
            concurrency = config.concurrency,
            destination = %config.destination.display(),
            "starting download job"
        );

        *slot = Slot::Running;
        self.progress.begin(total);

        let cursor = Arc::new(TaskCursor::new(config));
        let client = self.client.clone();
        let progress = Arc::clone(&self.progress);
        let slot_handle = Arc::clone(&self.slot);

        tokio::spawn(async move {
            worker::run_pool(cursor, client, Arc::clone(&progress)).await;
            // running must be false before the slot frees, so a snapshot
            // taken by the next submitter never shows a stale live job.
            progress.finish();
            *slot_handle.lock().unwrap() = Slot::Idle;
            info!("download job finished");
        });

        Ok(total)
    }

    /// Current aggregate snapshot; callable at any time, never blocks on job
    /// completion.
    pub fn status(&self) -> JobSnapshot {
        self.progress.snapshot()
    }
}
