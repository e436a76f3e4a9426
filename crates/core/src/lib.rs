//! Domain types shared by the reelgen server, worker, and client.
//!
//! Kept free of any async runtime or HTTP dependency so every other crate
//! in the workspace can depend on it.

pub mod error;
pub mod generation;
pub mod job;
pub mod samples;
pub mod types;
