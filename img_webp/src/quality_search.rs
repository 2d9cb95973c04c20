//! Quality Search
//!
//! Picks the encoding to use for one image:
//! - Images with an alpha channel get a single lossless candidate.
//! - Opaque images walk [`QUALITY_LADDER`]; a level is kept only when it is
//!   smaller than the best size so far (initially the original file size)
//!   and its decoded candidate scores at least [`SIMILARITY_THRESHOLD`].
//!
//! The ladder is always evaluated to the end and the smallest accepted
//! level wins, so a later level never displaces an earlier one unless it
//! is strictly smaller.

use crate::codec::{EncodeMode, ImageCodec};
use image::{DynamicImage, GenericImageView};
use shared_utils::{calculate_similarity, FileSize, Quality, Result, Similarity};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// ============================================================================
// Constants
// ============================================================================

/// Lossy quality levels tried for opaque images, highest first.
pub const QUALITY_LADDER: [Quality; 3] = [
    Quality::new_const(90),
    Quality::new_const(85),
    Quality::new_const(80),
];

/// Minimum similarity (inclusive) a lossy candidate needs to be accepted.
pub const SIMILARITY_THRESHOLD: f64 = 0.95;

// ============================================================================
// Types
// ============================================================================

/// One decoded input file. The raw bytes are kept for the size comparison.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub image: DynamicImage,
}

impl ImageAsset {
    pub fn new(path: impl Into<PathBuf>, bytes: Vec<u8>, image: DynamicImage) -> Self {
        Self {
            path: path.into(),
            bytes,
            image,
        }
    }

    /// Read `path` and decode it with `codec`.
    pub fn load(path: &Path, codec: &dyn ImageCodec) -> Result<Self> {
        let bytes = fs::read(path)?;
        let image = codec.decode(&bytes)?;
        Ok(Self::new(path, bytes, image))
    }

    pub fn size(&self) -> FileSize {
        FileSize::of(&self.bytes)
    }

    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEncoding {
    pub bytes: Vec<u8>,
    pub mode: EncodeMode,
    /// Score against the original; `None` for the lossless path.
    pub similarity: Option<Similarity>,
}

impl CandidateEncoding {
    pub fn size(&self) -> FileSize {
        FileSize::of(&self.bytes)
    }
}

// ============================================================================
// Search
// ============================================================================

/// Inclusive comparison against [`SIMILARITY_THRESHOLD`].
pub fn passes_similarity_gate(score: Similarity) -> bool {
    score.meets_threshold(SIMILARITY_THRESHOLD)
}

/// Choose the best candidate encoding for `asset`.
///
/// `Ok(None)` means no ladder level was both smaller than the original and
/// similar enough. Encoder failures propagate; a candidate that cannot be
/// decoded back only scores 0.0 and is rejected.
pub fn search(asset: &ImageAsset, codec: &dyn ImageCodec) -> Result<Option<CandidateEncoding>> {
    if asset.has_alpha() {
        let bytes = codec.encode(&asset.image, EncodeMode::Lossless)?;
        debug!(
            path = %asset.path.display(),
            size = bytes.len(),
            "Alpha channel present, using lossless encoding"
        );
        return Ok(Some(CandidateEncoding {
            bytes,
            mode: EncodeMode::Lossless,
            similarity: None,
        }));
    }

    let mut best_size = asset.size();
    let mut best: Option<CandidateEncoding> = None;

    for quality in QUALITY_LADDER {
        let mode = EncodeMode::Lossy(quality);
        let bytes = codec.encode(&asset.image, mode)?;
        let size = FileSize::of(&bytes);

        if size >= best_size {
            debug!(
                path = %asset.path.display(),
                %quality,
                %size,
                best = %best_size,
                "Candidate not smaller than best so far"
            );
            continue;
        }

        let score = candidate_similarity(asset, &bytes, codec);
        if !passes_similarity_gate(score) {
            debug!(
                path = %asset.path.display(),
                %quality,
                similarity = %score,
                "Candidate below similarity threshold"
            );
            continue;
        }

        debug!(
            path = %asset.path.display(),
            %quality,
            %size,
            similarity = %score,
            "Candidate accepted"
        );
        best_size = size;
        best = Some(CandidateEncoding {
            bytes,
            mode,
            similarity: Some(score),
        });
    }

    Ok(best)
}

fn candidate_similarity(asset: &ImageAsset, bytes: &[u8], codec: &dyn ImageCodec) -> Similarity {
    match codec.decode(bytes) {
        Ok(candidate) => calculate_similarity(&asset.image, &candidate),
        Err(e) => {
            warn!(path = %asset.path.display(), "Candidate could not be decoded: {}", e);
            Similarity::DISSIMILAR
        }
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::test_codec::{solid_rgb, ScriptedCodec};
    use proptest::prelude::*;

    const ORIGINAL_SIZE: usize = 1000;

    proptest! {
        /// The search result is the smallest similar-enough level below the
        /// original size (earliest on ties), whatever order sizes arrive in.
        #[test]
        fn prop_search_picks_smallest_passing_level(
            levels in proptest::collection::vec((9usize..1500, any::<bool>()), 3)
        ) {
            let mut codec = ScriptedCodec::new();
            for (quality, (size, similar)) in QUALITY_LADDER.iter().zip(&levels) {
                let decoded = solid_rgb(4, 4, if *similar { 100 } else { 255 });
                codec = codec.with_output(EncodeMode::Lossy(*quality), *size, decoded);
            }
            let asset = ImageAsset::new("p.jpg", vec![0u8; ORIGINAL_SIZE], solid_rgb(4, 4, 100));

            let expected = QUALITY_LADDER
                .iter()
                .zip(&levels)
                .filter(|(_, (size, similar))| *similar && *size < ORIGINAL_SIZE)
                .min_by_key(|(_, (size, _))| *size)
                .map(|(q, (size, _))| (EncodeMode::Lossy(*q), *size));

            let got = search(&asset, &codec)
                .unwrap()
                .map(|c| (c.mode, c.bytes.len()));
            prop_assert_eq!(got, expected);
            prop_assert_eq!(codec.encodes().len(), 3);
        }
    }
}
