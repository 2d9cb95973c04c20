//! Image Recompression Error Types
//!
//! One error enum for the whole pipeline. Per-file errors end up as
//! `ConversionOutcome::Failed` through their `Display` text; only
//! enumeration errors escape a batch run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImgError {
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Cannot enumerate directory {}: {reason}", path.display())]
    EnumerationError { path: PathBuf, reason: String },

    #[error("Output integrity check failed for {}: {reason}", path.display())]
    OutputIntegrity { path: PathBuf, reason: String },

    #[error("Refusing to operate on {}: {reason}", path.display())]
    UnsafeDirectory { path: PathBuf, reason: String },

    #[error("Failed to create worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImgError>;
