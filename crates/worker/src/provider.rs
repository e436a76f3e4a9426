//! Video providers.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reelgen_core::generation::GenerationParams;
use reelgen_core::samples;

/// Message recorded on jobs failed by [`MockProvider`] failure injection.
pub const SIMULATED_FAILURE: &str = "Simulated generation failure";

/// Errors a provider can report for a single job.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The provider could not produce a video.
    #[error("{0}")]
    Provider(String),

    /// The worker no longer accepts jobs.
    #[error("Generation worker is shutting down")]
    ShuttingDown,
}

/// Something that turns generation parameters into a video URL.
#[async_trait]
pub trait VideoProvider: Send + Sync + 'static {
    async fn generate(&self, params: &GenerationParams) -> Result<String, GenerationError>;
}

/// Pretends to render a video: waits a randomized delay, then returns a
/// sample URL for the requested aspect ratio.
#[derive(Debug, Clone)]
pub struct MockProvider {
    min_delay: Duration,
    max_delay: Duration,
    failure_rate: f64,
}

impl MockProvider {
    /// `max_delay` below `min_delay` is raised to `min_delay`; `failure_rate`
    /// is clamped into `0.0..=1.0`.
    pub fn new(min_delay: Duration, max_delay: Duration, failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_finite() {
            failure_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            min_delay,
            max_delay: max_delay.max(min_delay),
            failure_rate,
        }
    }

    fn roll(&self) -> (Duration, bool) {
        let mut rng = rand::rng();
        let span = (self.max_delay - self.min_delay).as_millis() as u64;
        let jitter = if span == 0 {
            0
        } else {
            rng.random_range(0..=span)
        };
        let fail = rng.random_bool(self.failure_rate);
        (self.min_delay + Duration::from_millis(jitter), fail)
    }
}

#[async_trait]
impl VideoProvider for MockProvider {
    async fn generate(&self, params: &GenerationParams) -> Result<String, GenerationError> {
        let (delay, fail) = self.roll();
        tokio::time::sleep(delay).await;

        if fail {
            return Err(GenerationError::Provider(SIMULATED_FAILURE.to_string()));
        }
        Ok(samples::select_sample(params.aspect_ratio, params.seed).to_string())
    }
}
