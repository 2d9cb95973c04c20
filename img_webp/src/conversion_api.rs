//! Conversion API Module
//!
//! Per-file decision: search for a candidate, replace the original only when
//! the candidate is strictly smaller, and never leave the file missing in
//! both forms. Every error is folded into [`ConversionOutcome::Failed`] so
//! one bad file never stops a batch.

use crate::codec::ImageCodec;
use crate::quality_search::{search, ImageAsset};
use shared_utils::common_utils::{display_name, with_target_extension};
use shared_utils::{
    safe_delete_original, write_output_durably, ConversionOutcome, FileSize, ImgError, Result,
    SkipReason,
};
use std::io;
use std::path::Path;
use tracing::{debug, error, info};

/// Filesystem side of a replacement: publish the new file, then drop the old.
struct FileOps {
    write: fn(&Path, &[u8]) -> Result<()>,
    delete_original: fn(&Path, &Path, FileSize) -> Result<()>,
}

const DISK: FileOps = FileOps {
    write: write_output_durably,
    delete_original: safe_delete_original,
};

/// Decide and apply the outcome for one file.
pub fn decide(path: &Path, codec: &dyn ImageCodec) -> ConversionOutcome {
    decide_with(path, codec, &DISK)
}

fn decide_with(path: &Path, codec: &dyn ImageCodec, ops: &FileOps) -> ConversionOutcome {
    match try_convert(path, codec, ops) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(path = %path.display(), "Error processing {}: {}", display_name(path), e);
            ConversionOutcome::failed(e)
        }
    }
}

fn try_convert(path: &Path, codec: &dyn ImageCodec, ops: &FileOps) -> Result<ConversionOutcome> {
    // An unreadable original is a failure even when its output name is taken.
    let asset = ImageAsset::load(path, codec)?;

    let output_path = with_target_extension(path, codec.target_extension());
    if output_path.exists() {
        debug!(output = %output_path.display(), "Output path already taken");
        return Ok(ConversionOutcome::skipped(SkipReason::OutputExists));
    }

    let original_size = asset.size();
    let (width, height) = asset.dimensions();
    debug!(
        path = %path.display(),
        %original_size,
        width,
        height,
        alpha = asset.has_alpha(),
        "Searching for a smaller encoding"
    );

    let Some(candidate) = search(&asset, codec)? else {
        return Ok(ConversionOutcome::skipped(SkipReason::NoAcceptableQuality));
    };

    let new_size = candidate.size();
    if new_size >= original_size {
        return Ok(ConversionOutcome::skipped(SkipReason::NotSmaller));
    }

    match (ops.write)(&output_path, &candidate.bytes) {
        Ok(()) => {}
        Err(ImgError::IoError(e)) if e.kind() == io::ErrorKind::AlreadyExists => {
            // Lost a race with another writer; theirs stays.
            return Ok(ConversionOutcome::skipped(SkipReason::OutputExists));
        }
        Err(e) => return Err(e),
    }

    (ops.delete_original)(path, &output_path, new_size)?;

    info!(
        original = %path.display(),
        output = %output_path.display(),
        mode = %candidate.mode,
        %original_size,
        %new_size,
        "Replaced original"
    );
    Ok(ConversionOutcome::converted(output_path, original_size, new_size))
}
