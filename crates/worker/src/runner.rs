//! Bounded-concurrency job runner.
//!
//! Each submitted job gets its own tracked Tokio task. A semaphore caps how
//! many jobs are `processing` at once; the rest stay `queued` until a permit
//! frees up. Provider errors and panics are recorded as `failed`.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use reelgen_core::generation::GenerationParams;
use reelgen_core::job::Job;
use reelgen_core::types::JobId;
use reelgen_store::JobStore;
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;

use crate::provider::{GenerationError, VideoProvider};

/// Error message recorded when a provider panics mid-job.
pub const PANIC_MESSAGE: &str = "Generation task panicked";

/// Runs generation jobs against a [`VideoProvider`] and writes results to
/// the shared [`JobStore`].
pub struct GenerationWorker<P> {
    store: Arc<JobStore>,
    provider: Arc<P>,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    max_concurrency: usize,
}

impl<P: VideoProvider> GenerationWorker<P> {
    /// `max_concurrency` is raised to 1 if zero.
    pub fn new(store: Arc<JobStore>, provider: P, max_concurrency: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            store,
            provider: Arc::new(provider),
            permits: Arc::new(Semaphore::new(max_concurrency)),
            tracker: TaskTracker::new(),
            max_concurrency,
        }
    }

    /// Whether [`submit`](Self::submit) will accept new jobs.
    pub fn is_accepting(&self) -> bool {
        !self.tracker.is_closed()
    }

    /// Number of jobs spawned and not yet finished (queued or processing).
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Number of jobs currently holding a permit.
    pub fn processing(&self) -> usize {
        self.max_concurrency - self.permits.available_permits()
    }

    /// Spawn the background task for a job already inserted in the store.
    /// Returns immediately.
    pub fn submit(&self, id: JobId, params: GenerationParams) -> Result<(), GenerationError> {
        if !self.is_accepting() {
            return Err(GenerationError::ShuttingDown);
        }

        let store = Arc::clone(&self.store);
        let provider = Arc::clone(&self.provider);
        let permits = Arc::clone(&self.permits);

        self.tracker
            .spawn(run_job(store, provider, permits, id, params));
        tracing::debug!(job_id = %id, in_flight = self.tracker.len(), "Job handed to worker");
        Ok(())
    }

    /// Stop accepting jobs and wait up to `timeout` for in-flight ones.
    /// Returns `true` if every task finished in time.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let remaining = self.tracker.len();
        tracing::info!(remaining, "Draining generation worker");

        let drained = tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok();
        if !drained {
            tracing::warn!(
                remaining = self.tracker.len(),
                "Generation worker did not drain before timeout",
            );
        }
        drained
    }
}

/// One job, start to finish.
async fn run_job<P: VideoProvider>(
    store: Arc<JobStore>,
    provider: Arc<P>,
    permits: Arc<Semaphore>,
    id: JobId,
    params: GenerationParams,
) {
    // Held until the job reaches a terminal status.
    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            record_failure(&store, id, "Generation worker closed").await;
            return;
        }
    };

    if let Err(e) = store.update(id, Job::start_processing).await {
        tracing::warn!(job_id = %id, error = %e, "Could not mark job processing");
        return;
    }
    tracing::info!(
        job_id = %id,
        aspect_ratio = %params.aspect_ratio,
        duration_secs = params.duration_secs,
        "Job processing",
    );

    let outcome = AssertUnwindSafe(provider.generate(&params))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(url)) => match store.update(id, |job| job.complete(url.as_str())).await {
            Ok(_) => tracing::info!(job_id = %id, url = %url, "Job completed"),
            Err(e) => tracing::warn!(job_id = %id, error = %e, "Could not mark job completed"),
        },
        Ok(Err(e)) => {
            tracing::warn!(job_id = %id, error = %e, "Generation failed");
            record_failure(&store, id, &e.to_string()).await;
        }
        Err(_) => {
            tracing::error!(job_id = %id, "Generation provider panicked");
            record_failure(&store, id, PANIC_MESSAGE).await;
        }
    }
}

async fn record_failure(store: &JobStore, id: JobId, message: &str) {
    if let Err(e) = store.update(id, |job| job.fail(message)).await {
        tracing::warn!(job_id = %id, error = %e, "Could not mark job failed");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
