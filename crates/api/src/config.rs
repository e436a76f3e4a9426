use std::str::FromStr;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight generation jobs (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Mock generation behaviour.
    pub generation: GenerationConfig,
}

/// Settings for the mock generation worker.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Lower bound of the simulated render delay.
    pub min_delay_ms: u64,
    /// Upper bound of the simulated render delay.
    pub max_delay_ms: u64,
    /// Jobs allowed in `processing` at once.
    pub max_concurrency: usize,
    /// Fraction of jobs that fail on purpose, `0.0..=1.0`.
    pub failure_rate: f64,
}

impl GenerationConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`      | `30`                       |
    /// | `GENERATION_MIN_DELAY_MS`    | `1200`                     |
    /// | `GENERATION_MAX_DELAY_MS`    | `2700`                     |
    /// | `GENERATION_MAX_CONCURRENCY` | `8`                        |
    /// | `GENERATION_FAILURE_RATE`    | `0.0`                      |
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let generation = GenerationConfig {
            min_delay_ms: env_or("GENERATION_MIN_DELAY_MS", 1200),
            max_delay_ms: env_or("GENERATION_MAX_DELAY_MS", 2700),
            max_concurrency: env_or("GENERATION_MAX_CONCURRENCY", 8),
            failure_rate: env_or("GENERATION_FAILURE_RATE", 0.0),
        };

        Self {
            host,
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            generation,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
