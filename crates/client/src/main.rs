//! `reelgen-client` -- submit a prompt and wait for the mock video.
//!
//! # Environment variables
//!
//! | Variable         | Required | Default                 | Description          |
//! |------------------|----------|-------------------------|----------------------|
//! | `REELGEN_SERVER` | no       | `http://localhost:3000` | Server root URL      |
//! | `RUST_LOG`       | no       | `reelgen_client=info`   | Log filter           |

use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use reelgen_client::{generate, GenerateClient};
use reelgen_core::generation::GenerateRequest;
use reelgen_core::job::{JobStatus, JobSnapshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "reelgen-client", version, about = "Generate a (mock) video from a prompt")]
struct Args {
    /// Server root URL.
    #[arg(long, env = "REELGEN_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// What the video should show.
    #[arg(long)]
    prompt: String,

    /// Clip length in seconds (2-20).
    #[arg(long, default_value_t = 8.0)]
    duration: f64,

    /// One of 16:9, 9:16, 1:1, 4:3.
    #[arg(long, default_value = "16:9")]
    aspect_ratio: String,

    /// Fixes sample selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between status queries.
    #[arg(long, default_value_t = 1500, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelgen_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let client = GenerateClient::new(&args.server);
    let request = GenerateRequest {
        prompt: Some(args.prompt),
        duration: Some(args.duration),
        aspect_ratio: Some(args.aspect_ratio),
        seed: args.seed,
    };

    let mut last_status: Option<JobStatus> = None;
    let result = generate(
        &client,
        &request,
        Duration::from_millis(args.poll_interval_ms),
        |snapshot: &JobSnapshot| {
            if last_status != Some(snapshot.status) {
                println!("status: {}", snapshot.status);
                last_status = Some(snapshot.status);
            }
        },
    )
    .await?;

    match (result.status, result.url, result.error) {
        (JobStatus::Completed, Some(url), _) => {
            println!("{url}");
            Ok(())
        }
        (_, _, error) => bail!(
            "Generation failed: {}",
            error.unwrap_or_else(|| "unknown error".to_string())
        ),
    }
}
