use std::sync::Arc;

use reelgen_store::JobStore;
use reelgen_worker::{GenerationWorker, MockProvider};

use crate::config::ServerConfig;

/// The worker type the server runs with.
pub type Worker = GenerationWorker<MockProvider>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Job records, shared with the worker.
    pub store: Arc<JobStore>,
    /// Background generation worker.
    pub worker: Arc<Worker>,
}

impl AppState {
    /// Build a fresh store and worker from configuration.
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(JobStore::new());
        let provider = MockProvider::new(
            config.generation.min_delay(),
            config.generation.max_delay(),
            config.generation.failure_rate,
        );
        let worker = Arc::new(GenerationWorker::new(
            Arc::clone(&store),
            provider,
            config.generation.max_concurrency,
        ));

        Self {
            config: Arc::new(config),
            store,
            worker,
        }
    }
}
