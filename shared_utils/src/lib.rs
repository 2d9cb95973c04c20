//! Shared Utilities for the img-webp recompression tool
//!
//! Format-agnostic plumbing used by the conversion engine and the CLI:
//! - Error type
//! - Logging bootstrap (tracing)
//! - File enumeration and the batch tally
//! - Conversion outcomes and crash-safe output replacement
//! - Normalized MSE similarity metric
//! - Type-safe wrappers (file size, quality, similarity)
//! - Progress bar, summary report, safety guard, worker-pool sizing

pub mod batch;
pub mod common_utils;
pub mod conversion;
pub mod errors;
pub mod image_metrics;
pub mod logging;
pub mod progress;
pub mod report;
pub mod safety;
pub mod thread_manager;
pub mod types;

pub use batch::{collect_files, BatchTally, SUPPORTED_IMAGE_EXTENSIONS};
pub use conversion::{
    safe_delete_original, verify_output_integrity, write_output_durably, ConversionOutcome,
    SkipReason,
};
pub use errors::{ImgError, Result};
pub use image_metrics::{calculate_similarity, similarity_description};
pub use progress::{create_progress_bar, format_bytes, format_duration};
pub use report::{print_summary_report, summary_json};
pub use safety::check_dangerous_directory;
pub use types::{FileSize, Quality, QualityError, Similarity, SimilarityError};
