//! In-memory job store.
//!
//! One [`JobStore`] is created at startup and shared (behind an `Arc`) by the
//! HTTP handlers and the generation worker. Records are never evicted; they
//! live until the process exits.

use std::collections::HashMap;

use reelgen_core::error::CoreError;
use reelgen_core::job::{Job, JobSnapshot};
use reelgen_core::types::JobId;
use tokio::sync::RwLock;

/// Process-wide map of jobs keyed by id.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new job. Returns [`CoreError::Conflict`] if the id is taken.
    pub async fn insert(&self, job: Job) -> Result<JobSnapshot, CoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(CoreError::Conflict(format!("Job {} already exists", job.id)));
        }
        let snapshot = job.snapshot();
        jobs.insert(job.id, job);
        Ok(snapshot)
    }

    /// Full record, including the normalized request.
    pub async fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Client-visible view of a job.
    pub async fn snapshot(&self, id: JobId) -> Option<JobSnapshot> {
        self.jobs.read().await.get(&id).map(Job::snapshot)
    }

    /// Apply a status transition to a job.
    ///
    /// The closure runs against a copy; the stored record is only replaced
    /// when it succeeds, so a rejected transition leaves it untouched.
    pub async fn update<F>(&self, id: JobId, apply: F) -> Result<JobSnapshot, CoreError>
    where
        F: FnOnce(&mut Job) -> Result<(), CoreError>,
    {
        let mut jobs = self.jobs.write().await;
        let current = jobs.get(&id).ok_or_else(|| CoreError::NotFound {
            entity: "Job",
            id: id.to_string(),
        })?;

        let mut next = current.clone();
        if let Err(e) = apply(&mut next) {
            tracing::warn!(job_id = %id, status = %current.status, error = %e, "Rejected job update");
            return Err(e);
        }

        let snapshot = next.snapshot();
        jobs.insert(id, next);
        Ok(snapshot)
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
