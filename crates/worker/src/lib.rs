//! Background generation worker.
//!
//! Provides:
//! - [`VideoProvider`]: the seam a real video backend would implement
//! - [`MockProvider`]: sleeps for a randomized delay and returns a sample URL
//! - [`GenerationWorker`]: runs submitted jobs with bounded concurrency and
//!   records their outcome in the [`JobStore`](reelgen_store::JobStore)

pub mod provider;
pub mod runner;

pub use provider::{GenerationError, MockProvider, VideoProvider};
pub use runner::GenerationWorker;
