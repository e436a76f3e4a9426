//! Generation request normalization and validation.
//!
//! The wire request is deliberately lenient (every field optional); it is
//! turned into [`GenerationParams`] by [`GenerationParams::from_request`],
//! which truncates the prompt, clamps the duration, and falls back to the
//! default aspect ratio.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Prompts shorter than this (after trimming) are rejected.
pub const MIN_PROMPT_CHARS: usize = 5;
/// Prompts are truncated to this many characters.
pub const MAX_PROMPT_CHARS: usize = 500;

pub const MIN_DURATION_SECS: f64 = 2.0;
pub const MAX_DURATION_SECS: f64 = 20.0;
/// Used when the request omits the duration or sends a non-finite value.
pub const DEFAULT_DURATION_SECS: f64 = 8.0;

/// Error message returned for a prompt below [`MIN_PROMPT_CHARS`].
pub const PROMPT_TOO_SHORT: &str = "Prompt too short";

// ---------------------------------------------------------------------------
// Aspect ratio
// ---------------------------------------------------------------------------

/// Output frame shape. Unrecognized values fall back to [`AspectRatio::Landscape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Classic,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Square,
        AspectRatio::Classic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Classic => "4:3",
        }
    }

    /// Parse a wire value such as `"9:16"`, returning `None` if unknown.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ar| ar.as_str() == value.trim())
    }

    /// Parse a wire value, defaulting when absent or unrecognized.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Wire request
// ---------------------------------------------------------------------------

/// Body of `POST /api/generate`. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Makes sample selection deterministic when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Response body of a successful `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub job_id: String,
    pub status: crate::job::JobStatus,
}

// ---------------------------------------------------------------------------
// Normalized parameters
// ---------------------------------------------------------------------------

/// A validated, clamped generation request as stored on the job record.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub prompt: String,
    pub duration_secs: f64,
    pub aspect_ratio: AspectRatio,
    pub seed: Option<u64>,
}

impl GenerationParams {
    /// Normalize a wire request. Fails only when the prompt is too short.
    pub fn from_request(req: &GenerateRequest) -> Result<Self, CoreError> {
        let prompt = normalize_prompt(req.prompt.as_deref().unwrap_or_default())?;
        Ok(Self {
            prompt,
            duration_secs: clamp_duration(req.duration),
            aspect_ratio: AspectRatio::parse_or_default(req.aspect_ratio.as_deref()),
            seed: req.seed,
        })
    }
}

/// Trim and truncate a prompt to [`MAX_PROMPT_CHARS`], rejecting anything
/// shorter than [`MIN_PROMPT_CHARS`].
pub fn normalize_prompt(raw: &str) -> Result<String, CoreError> {
    let prompt: String = raw.trim().chars().take(MAX_PROMPT_CHARS).collect();
    if prompt.chars().count() < MIN_PROMPT_CHARS {
        return Err(CoreError::Validation(PROMPT_TOO_SHORT.to_string()));
    }
    Ok(prompt)
}

/// Clamp a requested duration into `MIN_DURATION_SECS..=MAX_DURATION_SECS`.
pub fn clamp_duration(duration: Option<f64>) -> f64 {
    match duration {
        Some(d) if d.is_finite() => d.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS),
        _ => DEFAULT_DURATION_SECS,
    }
}

/// Client-side submit gate: refuse obviously invalid input before it
/// reaches the server. Stricter than the server, which clamps instead.
pub fn validate_submission(prompt: &str, duration_secs: f64) -> Result<(), CoreError> {
    if prompt.trim().chars().count() < MIN_PROMPT_CHARS {
        return Err(CoreError::Validation(PROMPT_TOO_SHORT.to_string()));
    }
    if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&duration_secs) {
        return Err(CoreError::Validation(format!(
            "Duration must be between {MIN_DURATION_SECS} and {MAX_DURATION_SECS} seconds"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
