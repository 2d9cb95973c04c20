//! Image Similarity Metric
//!
//! Normalized mean-squared-error similarity between an original image and a
//! re-encoded candidate:
//!
//! ```text
//! score = 1 - Σ(Δ²) / (pixels × 3 × 255²)
//! ```
//!
//! Both inputs are flattened to RGB8 (alpha dropped). When dimensions differ
//! the candidate is resampled onto the original's grid, never the reverse.
//!
//! # Limitations
//!
//! This is a numeric metric, not a perceptual one. It is lenient: a score of
//! 0.95 still allows an RMS error of ~57 levels per channel. Structurally
//! different images with close averages can pass, while a visually identical
//! image with per-pixel noise (dither, grain shift) can score lower than a
//! blurred one. Treat the gate as a sanity floor, not a quality guarantee.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage};
use rayon::prelude::*;

use crate::types::Similarity;

const CHANNELS: f64 = 3.0;
const MAX_CHANNEL_VALUE: f64 = 255.0;

/// Filter used to bring the candidate onto the original's pixel grid.
pub const RESAMPLE_FILTER: FilterType = FilterType::CatmullRom;

/// Similarity of `candidate` to `original`, in [0, 1].
///
/// Returns [`Similarity::DISSIMILAR`] for degenerate input (zero-area images)
/// so a broken candidate can never pass the gate.
pub fn calculate_similarity(original: &DynamicImage, candidate: &DynamicImage) -> Similarity {
    let (w, h) = original.dimensions();
    if w == 0 || h == 0 {
        return Similarity::DISSIMILAR;
    }
    let (cw, ch) = candidate.dimensions();
    if cw == 0 || ch == 0 {
        return Similarity::DISSIMILAR;
    }

    let orig_rgb = original.to_rgb8();
    let cand_rgb = if (cw, ch) == (w, h) {
        candidate.to_rgb8()
    } else {
        candidate.resize_exact(w, h, RESAMPLE_FILTER).to_rgb8()
    };

    similarity_rgb(&orig_rgb, &cand_rgb)
}

/// Same-shape RGB8 comparison. Shape mismatch is fail-closed.
pub fn similarity_rgb(original: &RgbImage, candidate: &RgbImage) -> Similarity {
    if original.dimensions() != candidate.dimensions() {
        return Similarity::DISSIMILAR;
    }
    let pixel_count = original.width() as u64 * original.height() as u64;
    if pixel_count == 0 {
        return Similarity::DISSIMILAR;
    }

    // Row-parallel integer accumulation: exact regardless of scheduling.
    let row_len = original.width() as usize * 3;
    let diff_sum: u64 = original
        .as_raw()
        .par_chunks(row_len)
        .zip(candidate.as_raw().par_chunks(row_len))
        .map(|(a, b)| {
            a.iter()
                .zip(b.iter())
                .map(|(&x, &y)| {
                    let d = x as i64 - y as i64;
                    (d * d) as u64
                })
                .sum::<u64>()
        })
        .sum();

    let max_diff = pixel_count as f64 * CHANNELS * MAX_CHANNEL_VALUE * MAX_CHANNEL_VALUE;
    Similarity::clamped(1.0 - diff_sum as f64 / max_diff)
}

pub fn similarity_description(score: Similarity) -> &'static str {
    let v = score.value();
    if v >= 0.999 {
        "Identical or near-identical"
    } else if v >= 0.99 {
        "Very close"
    } else if v >= 0.95 {
        "Acceptable"
    } else {
        "Rejected - too different"
    }
}
