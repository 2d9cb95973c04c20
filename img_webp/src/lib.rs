//! img-webp: batch JPEG/PNG to WebP recompression
//!
//! - [`codec`]: decode/encode seam and the libwebp-backed implementation
//! - [`quality_search`]: quality ladder plus similarity gate
//! - [`conversion_api`]: per-file replace-or-skip decision
//! - [`batch_runner`]: directory walk, worker pool, tally

pub mod batch_runner;
pub mod codec;
pub mod conversion_api;
pub mod quality_search;

#[cfg(test)]
pub(crate) mod test_codec;

pub use batch_runner::{run, RunOptions};
pub use codec::{EncodeMode, ImageCodec, WebpCodec};
pub use conversion_api::decide;
pub use quality_search::{
    passes_similarity_gate, search, CandidateEncoding, ImageAsset, QUALITY_LADDER,
    SIMILARITY_THRESHOLD,
};

pub use shared_utils::{BatchTally, ConversionOutcome, ImgError, Result, SkipReason};
