//! Query parameter types for API handlers.

use serde::Deserialize;

/// `?jobId=` on `GET /api/generate`. Optional so a missing id can be
/// reported as a 400 with our own message instead of an extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobIdParams {
    pub job_id: Option<String>,
}
