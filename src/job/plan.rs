//! Per-job configuration and task derivation.
//!
//! A [`JobConfig`] fully determines the work of a job: every task in the
//! range can be derived from it without side effects, in order, any number
//! of times. The [`TaskCursor`] layers concurrent claim semantics on top of
//! that derivation so pool workers can pull the next unclaimed id without a
//! queue.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Integer placeholder expected exactly once in the URL template.
pub const PLACEHOLDER: &str = "{}";

/// Fixed suffix for files written under the destination folder.
pub const FILE_SUFFIX: &str = "_0.jpg";

/// Immutable configuration for one download job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// URL template with one `{}` placeholder for the resource id.
    pub url_template: String,
    pub range_start: u64,
    pub range_end: u64,
    /// Local folder all fetched files land in.
    pub destination: PathBuf,
    /// Skip tasks whose destination file already exists.
    pub skip_existing: bool,
    /// Hard ceiling on simultaneously in-flight fetches.
    pub concurrency: usize,
}

#[derive(Debug, Error)]
pub enum JobConfigError {
    #[error("range start {start} exceeds range end {end}")]
    InvertedRange { start: u64, end: u64 },

    #[error("concurrency limit must be positive")]
    ZeroConcurrency,

    #[error("url template must contain exactly one '{{}}' placeholder, found {0}")]
    PlaceholderCount(usize),

    #[error("cannot create destination folder {}: {source}", path.display())]
    Destination {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl JobConfig {
    /// Checks the parameter invariants that need no filesystem access.
    pub fn validate(&self) -> Result<(), JobConfigError> {
        if self.range_start > self.range_end {
            return Err(JobConfigError::InvertedRange {
                start: self.range_start,
                end: self.range_end,
            });
        }

        if self.concurrency == 0 {
            return Err(JobConfigError::ZeroConcurrency);
        }

        let placeholders = self.url_template.matches(PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(JobConfigError::PlaceholderCount(placeholders));
        }

        Ok(())
    }

    /// Number of tasks in range, fixed at job start.
    pub fn total(&self) -> usize {
        (self.range_end - self.range_start + 1) as usize
    }

    /// Derives the task for one id.
    pub fn task(&self, id: u64) -> FetchTask {
        FetchTask {
            id,
            url: resolve_url(&self.url_template, id),
            path: destination_path(&self.destination, id),
        }
    }

    /// Lazy, ordered enumeration of every task in the range.
    pub fn tasks(&self) -> impl Iterator<Item = FetchTask> + '_ {
        (self.range_start..=self.range_end).map(|id| self.task(id))
    }
}

/// Expands the template placeholder with a resource id.
pub fn resolve_url(template: &str, id: u64) -> String {
    template.replacen(PLACEHOLDER, &id.to_string(), 1)
}

/// Local file path for a resource id: `<folder>/<id>_0.jpg`.
pub fn destination_path(folder: &Path, id: u64) -> PathBuf {
    folder.join(format!("{id}{FILE_SUFFIX}"))
}

/// One unit of work: a single numbered resource to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    pub id: u64,
    pub url: String,
    pub path: PathBuf,
}

/// Shared claim cursor over a job's id range.
///
/// Each `claim` hands out the next unclaimed id exactly once across all
/// workers; ids are claimed in ascending order.
pub struct TaskCursor {
    config: JobConfig,
    next: AtomicU64,
}

impl TaskCursor {
    pub fn new(config: JobConfig) -> Self {
        let next = AtomicU64::new(config.range_start);
        Self { config, next }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Claims the next unclaimed task, or `None` once the range is exhausted.
    pub fn claim(&self) -> Option<FetchTask> {
        let end = self.config.range_end;
        let id = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| {
                (id <= end).then(|| id + 1)
            })
            .ok()?;
        Some(self.config.task(id))
    }
}
