//! Handlers for the `/api/generate` resource.
//!
//! `POST` creates a job and hands it to the worker without waiting for it;
//! `GET` returns the current snapshot for polling clients.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use reelgen_core::error::CoreError;
use reelgen_core::generation::{GenerateRequest, GenerateResponse, GenerationParams};
use reelgen_core::job::{Job, JobSnapshot};
use reelgen_core::types::JobId;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::query::JobIdParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decode a request body field by field.
///
/// A body that is not JSON counts as empty. A field with an unusable type
/// falls back to its default without affecting the others, so only the
/// prompt can make a submission fail.
fn parse_request(body: &[u8]) -> GenerateRequest {
    let value: Value = serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Unparseable generate body, treating as empty");
        Value::Null
    });

    GenerateRequest {
        prompt: value.get("prompt").and_then(prompt_text),
        duration: value.get("duration").and_then(lenient_number),
        aspect_ratio: value
            .get("aspectRatio")
            .and_then(Value::as_str)
            .map(str::to_owned),
        seed: value.get("seed").and_then(Value::as_u64),
    }
}

/// Scalars are stringified (`42` becomes `"42"`). Arrays and objects are
/// treated as missing.
fn prompt_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numbers pass through, numeric strings are parsed (blank reads as 0) and
/// booleans read as 0 or 1. Anything else is missing.
fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn job_not_found(id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Job",
        id: id.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/generate
///
/// Validate the request, store a `queued` job, and schedule it on the
/// worker. Responds immediately with `{jobId, status}`.
pub async fn submit_generation(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<GenerateResponse>> {
    let request = parse_request(&body);
    let params = GenerationParams::from_request(&request)?;

    if !state.worker.is_accepting() {
        return Err(AppError::Unavailable("Server is shutting down".into()));
    }

    let job = Job::new(JobId::new_v4(), params.clone());
    let id = job.id;
    let snapshot = state.store.insert(job).await?;

    if let Err(e) = state.worker.submit(id, params.clone()) {
        let message = e.to_string();
        if let Err(update_err) = state.store.update(id, |job| job.fail(message.as_str())).await {
            tracing::warn!(job_id = %id, error = %update_err, "Could not fail rejected job");
        }
        return Err(AppError::Unavailable(message));
    }

    tracing::info!(
        job_id = %id,
        aspect_ratio = %params.aspect_ratio,
        duration_secs = params.duration_secs,
        prompt_chars = params.prompt.chars().count(),
        "Generation job submitted",
    );

    Ok(Json(GenerateResponse {
        job_id: id.to_string(),
        status: snapshot.status,
    }))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/generate?jobId={id}
///
/// Return the job snapshot verbatim. A malformed id cannot name a stored
/// job, so it is reported as not found rather than as bad input.
pub async fn get_generation_status(
    State(state): State<AppState>,
    Query(params): Query<JobIdParams>,
) -> AppResult<Json<JobSnapshot>> {
    let raw_id = params
        .job_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing jobId".into()))?;

    let id: JobId = raw_id.parse().map_err(|_| job_not_found(raw_id))?;

    let snapshot = state
        .store
        .snapshot(id)
        .await
        .ok_or_else(|| job_not_found(raw_id))?;

    Ok(Json(snapshot))
}
