//! Submit-then-poll loop.
//!
//! Queries job status immediately after submission, then on a fixed
//! interval until a terminal snapshot arrives. Failed queries are logged
//! and retried on the next tick.

use std::time::Duration;

use reelgen_core::generation::{self, GenerateRequest, DEFAULT_DURATION_SECS};
use reelgen_core::job::JobSnapshot;
use tokio::time::MissedTickBehavior;

use crate::client::{ClientError, GenerateClient};

/// Interval between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Shortest interval the poller will use.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Poll `job_id` until it reaches `completed` or `failed`.
///
/// `on_update` sees every snapshot received, in order. There is no overall
/// timeout; the server always resolves jobs eventually. `interval` is raised
/// to [`MIN_POLL_INTERVAL`] if shorter.
pub async fn poll_until_terminal<F>(
    client: &GenerateClient,
    job_id: &str,
    interval: Duration,
    mut on_update: F,
) -> JobSnapshot
where
    F: FnMut(&JobSnapshot),
{
    // First tick fires immediately.
    let mut ticker = tokio::time::interval(interval.max(MIN_POLL_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match client.status(job_id).await {
            Ok(snapshot) => {
                on_update(&snapshot);
                if snapshot.is_terminal() {
                    return snapshot;
                }
            }
            Err(e) => {
                tracing::warn!(job_id, error = %e, "Status query failed, retrying");
            }
        }
    }
}

/// Validate, submit, and poll a request to completion.
///
/// Returns the terminal snapshot. Submission problems (local validation or
/// a rejected `POST`) are errors; a job that *fails* is not.
pub async fn generate<F>(
    client: &GenerateClient,
    request: &GenerateRequest,
    interval: Duration,
    on_update: F,
) -> Result<JobSnapshot, ClientError>
where
    F: FnMut(&JobSnapshot),
{
    generation::validate_submission(
        request.prompt.as_deref().unwrap_or_default(),
        request.duration.unwrap_or(DEFAULT_DURATION_SECS),
    )
    .map_err(|e| ClientError::Invalid(e.to_string()))?;

    let submitted = client.submit(request).await?;
    tracing::info!(job_id = %submitted.job_id, status = %submitted.status, "Job submitted");

    Ok(poll_until_terminal(client, &submitted.job_id, interval, on_update).await)
}
