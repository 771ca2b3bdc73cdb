//! Per-task execution: resolve the destination, fetch, store, report.

use tokio::fs;
use tracing::{debug, warn};

use super::http::HttpClient;
use crate::job::plan::FetchTask;
use crate::job::progress::{FetchOutcome, OutcomeStatus};

/// Destination resolver decision for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Fetch,
    Skip,
}

/// Applies the skip-existing policy against the filesystem.
///
/// The existence probe and the eventual write are not atomic with respect to
/// each other; a file appearing in between is overwritten and recorded as
/// success.
pub async fn resolve(task: &FetchTask, skip_existing: bool) -> Disposition {
    if skip_existing && fs::try_exists(&task.path).await.unwrap_or(false) {
        Disposition::Skip
    } else {
        Disposition::Fetch
    }
}

/// Executes one task to its terminal outcome.
///
/// Infallible at the task level: every branch, including transport and
/// storage failures, reduces to exactly one [`FetchOutcome`]. The file write
/// completes before the outcome is published.
pub async fn execute(client: &HttpClient, task: &FetchTask, skip_existing: bool) -> FetchOutcome {
    if resolve(task, skip_existing).await == Disposition::Skip {
        debug!(id = task.id, path = %task.path.display(), "destination exists, skipping");
        return FetchOutcome::new(task.id, OutcomeStatus::Skipped, "already exists");
    }

    let response = match client.get(&task.url).await {
        Ok(response) => response,
        Err(err) => {
            warn!(id = task.id, url = %task.url, error = %err, "fetch failed");
            return FetchOutcome::new(task.id, OutcomeStatus::NetworkError, err.to_string());
        }
    };

    let status = response.status();
    if !status.is_success() {
        debug!(id = task.id, %status, "origin returned non-success");
        return FetchOutcome::new(task.id, OutcomeStatus::NotFound, format!("HTTP {status}"));
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(err) => {
            warn!(id = task.id, url = %task.url, error = %err, "body read failed");
            return FetchOutcome::new(
                task.id,
                OutcomeStatus::NetworkError,
                format!("body read failed: {err}"),
            );
        }
    };

    if let Err(err) = fs::write(&task.path, &body).await {
        warn!(id = task.id, path = %task.path.display(), error = %err, "write failed");
        return FetchOutcome::new(
            task.id,
            OutcomeStatus::NetworkError,
            format!("write to {} failed: {err}", task.path.display()),
        );
    }

    debug!(id = task.id, bytes = body.len(), "stored");
    FetchOutcome::new(
        task.id,
        OutcomeStatus::Success,
        format!("downloaded {} bytes", body.len()),
    )
}
