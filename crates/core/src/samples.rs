//! Fixed catalog of public sample videos returned by the mock generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::generation::AspectRatio;

const SAMPLE_5S: &str = "https://files.samplelib.com/mp4/sample-5s.mp4";
const SAMPLE_10S: &str = "https://files.samplelib.com/mp4/sample-10s.mp4";
const SURFING_PORTRAIT: &str =
    "https://cdn.coverr.co/videos/coverr-surfing-at-sunset-1767/1080p.mp4";

const LANDSCAPE: &[&str] = &[SAMPLE_5S, SAMPLE_10S];
const PORTRAIT: &[&str] = &[SURFING_PORTRAIT];
const SQUARE: &[&str] = &[SAMPLE_10S];
const CLASSIC: &[&str] = &[SAMPLE_5S];

/// Sample URLs available for an aspect ratio. Never empty.
pub fn samples_for(aspect_ratio: AspectRatio) -> &'static [&'static str] {
    match aspect_ratio {
        AspectRatio::Landscape => LANDSCAPE,
        AspectRatio::Portrait => PORTRAIT,
        AspectRatio::Square => SQUARE,
        AspectRatio::Classic => CLASSIC,
    }
}

/// Pick one sample for `aspect_ratio` using the given RNG.
pub fn pick_sample<R: Rng + ?Sized>(aspect_ratio: AspectRatio, rng: &mut R) -> &'static str {
    let list = samples_for(aspect_ratio);
    list[rng.random_range(0..list.len())]
}

/// Pick a sample, deterministically when a seed is given.
pub fn select_sample(aspect_ratio: AspectRatio, seed: Option<u64>) -> &'static str {
    match seed {
        Some(seed) => pick_sample(aspect_ratio, &mut StdRng::seed_from_u64(seed)),
        None => pick_sample(aspect_ratio, &mut rand::rng()),
    }
}
