//! API models for the download and status endpoints.
//!
//! `POST /download` accepts a [`DownloadRequest`] and answers with a
//! [`DownloadStarted`] acknowledgment; the job itself runs in the
//! background. `GET /status` returns the job controller's current
//! [`crate::job::progress::JobSnapshot`] serialized as
//! `{running, total, completed, progress: [{id, status, message}, ...]}`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::FetchConfig;
use crate::job::plan::JobConfig;

/// Job submission payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadRequest {
    /// URL template with one `{}` integer placeholder.
    pub base_url: String,
    pub start: u64,
    pub end: u64,
    /// Destination folder; created if absent.
    pub folder: PathBuf,
    #[serde(default = "default_skip_existing")]
    pub skip_existing: bool,
    /// Worker-pool size override; falls back to the configured default.
    pub concurrency: Option<usize>,
}

fn default_skip_existing() -> bool {
    true
}

impl DownloadRequest {
    /// Fills unset knobs from server configuration and produces the
    /// immutable per-job configuration.
    pub fn into_job_config(self, fetch: &FetchConfig) -> JobConfig {
        JobConfig {
            url_template: self.base_url,
            range_start: self.start,
            range_end: self.end,
            destination: self.folder,
            skip_existing: self.skip_existing,
            concurrency: self.concurrency.unwrap_or(fetch.concurrency),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadStarted {
    /// Always `"started"`.
    pub status: String,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
