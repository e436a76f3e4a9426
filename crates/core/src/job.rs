//! Job record and status lifecycle.
//!
//! A job only ever moves forward: `queued -> processing -> completed | failed`.
//! Skipping `processing` is allowed; anything else (including leaving a
//! terminal status) is rejected with [`CoreError::Conflict`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::generation::GenerationParams;
use crate::types::{JobId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a generation job. Serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Position in the lifecycle. Both terminal statuses share the top rank.
    pub fn rank(self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::Processing => 1,
            JobStatus::Completed | JobStatus::Failed => 2,
        }
    }

    /// `completed` and `failed` end the lifecycle; pollers stop on them.
    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }

    /// Whether moving from `self` to `next` keeps the lifecycle monotonic.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        next.rank() > self.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The client-visible view of a job: `{status, url?, error?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobSnapshot {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

// ---------------------------------------------------------------------------
// Job record
// ---------------------------------------------------------------------------

/// Server-side job record as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub url: Option<String>,
    pub error: Option<String>,
    /// The normalized request that created this job.
    pub params: GenerationParams,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    /// A freshly submitted job in `queued` status.
    pub fn new(id: JobId, params: GenerationParams) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            status: JobStatus::Queued,
            url: None,
            error: None,
            params,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            status: self.status,
            url: self.url.clone(),
            error: self.error.clone(),
        }
    }

    /// Mark the job as picked up by a worker.
    pub fn start_processing(&mut self) -> Result<(), CoreError> {
        self.advance(JobStatus::Processing)
    }

    /// Finish the job successfully with a result URL.
    pub fn complete(&mut self, url: impl Into<String>) -> Result<(), CoreError> {
        self.advance(JobStatus::Completed)?;
        self.url = Some(url.into());
        Ok(())
    }

    /// Finish the job with an error message.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), CoreError> {
        self.advance(JobStatus::Failed)?;
        self.error = Some(error.into());
        Ok(())
    }

    fn advance(&mut self, next: JobStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::Conflict(format!(
                "Job {} cannot move from {} to {next}",
                self.id, self.status
            )));
        }
        self.status = next;
        self.updated_at = chrono::Utc::now();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::AspectRatio;
    use assert_matches::assert_matches;

    fn params() -> GenerationParams {
        GenerationParams {
            prompt: "a lighthouse in a storm".to_string(),
            duration_secs: 8.0,
            aspect_ratio: AspectRatio::Landscape,
            seed: None,
        }
    }

    // -- JobStatus ------------------------------------------------------------

    #[test]
    fn status_ordering_is_monotonic() {
        assert!(JobStatus::Queued.can_transition_to(JobStatus::Processing));
        assert!(JobStatus::Queued.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Processing.can_transition_to(JobStatus::Queued));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Failed.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Queued.can_transition_to(JobStatus::Queued));
    }

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&JobStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let parsed: JobStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(parsed, JobStatus::Failed);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<JobStatus>("\"canceled\"").is_err());
    }

    // -- Job lifecycle ----------------------------------------------------------

    #[test]
    fn new_job_is_queued_with_empty_result() {
        let job = Job::new(JobId::new_v4(), params());
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(
            job.snapshot(),
            JobSnapshot {
                status: JobStatus::Queued,
                url: None,
                error: None
            }
        );
    }

    #[test]
    fn complete_sets_url() {
        let mut job = Job::new(JobId::new_v4(), params());
        job.start_processing().unwrap();
        job.complete("https://example.com/v.mp4").unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.url.as_deref(), Some("https://example.com/v.mp4"));
        assert!(job.updated_at >= job.created_at);
    }

    #[test]
    fn fail_directly_from_queued() {
        let mut job = Job::new(JobId::new_v4(), params());
        job.fail("boom").unwrap();
        assert_eq!(job.snapshot().error.as_deref(), Some("boom"));
    }

    #[test]
    fn terminal_job_rejects_further_transitions() {
        let mut job = Job::new(JobId::new_v4(), params());
        job.complete("https://example.com/v.mp4").unwrap();

        assert_matches!(job.fail("late"), Err(CoreError::Conflict(_)));
        assert_matches!(job.start_processing(), Err(CoreError::Conflict(_)));
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.error.is_none());
    }

    #[test]
    fn snapshot_omits_absent_fields() {
        let job = Job::new(JobId::new_v4(), params());
        let json = serde_json::to_value(job.snapshot()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "queued" }));
    }
}
