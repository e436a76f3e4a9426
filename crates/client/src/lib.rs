//! `reelgen-client` library crate.
//!
//! HTTP client for the generate endpoint plus the status poller. The
//! binary entrypoint lives in `main.rs`.

pub mod client;
pub mod poller;

pub use client::{ClientError, GenerateClient, DEFAULT_REQUEST_TIMEOUT};
pub use poller::{generate, poll_until_terminal, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
