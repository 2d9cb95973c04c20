//! Batch Processing Module
//!
//! File enumeration for a run and the tally the orchestrator folds outcomes
//! into. The tally has a single writer (the orchestrating thread), so it is a
//! plain struct with no interior synchronization.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::conversion::ConversionOutcome;
use crate::errors::{ImgError, Result};
use crate::types::FileSize;

/// Inputs the recompressor picks up. Matched case-insensitively.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Recursively collect regular files under `dir` whose extension is in
/// `extensions`.
///
/// The returned list is sorted and final: nothing is rescanned during the
/// run. An unreadable root is an error; unreadable entries below it are
/// logged and skipped. Symlinks are not followed.
pub fn collect_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let meta = std::fs::metadata(dir).map_err(|e| ImgError::EnumerationError {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !meta.is_dir() {
        return Err(ImgError::EnumerationError {
            path: dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        match entry {
            Ok(e) => {
                if e.file_type().is_file()
                    && crate::common_utils::has_extension(e.path(), extensions)
                {
                    files.push(e.into_path());
                }
            }
            Err(e) if e.depth() == 0 => {
                return Err(ImgError::EnumerationError {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
            }
        }
    }

    files.sort();
    Ok(files)
}

// ============================================================================
// BatchTally
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchTally {
    pub total: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Sum of original sizes of converted files.
    pub input_bytes: FileSize,
    /// Sum of replacement sizes of converted files.
    pub output_bytes: FileSize,
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchTally {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Fold one per-file outcome into the counters.
    pub fn record(&mut self, path: &Path, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted {
                original_size,
                new_size,
                ..
            } => {
                self.converted += 1;
                self.input_bytes = self.input_bytes.saturating_add(*original_size);
                self.output_bytes = self.output_bytes.saturating_add(*new_size);
            }
            ConversionOutcome::Skipped { .. } => self.skipped += 1,
            ConversionOutcome::Failed { reason } => {
                self.failed += 1;
                self.errors.push((path.to_path_buf(), reason.clone()));
            }
        }
    }

    /// Outcomes folded so far.
    pub fn processed(&self) -> usize {
        self.converted + self.skipped + self.failed
    }

    pub fn bytes_saved(&self) -> FileSize {
        self.input_bytes.saturating_sub(self.output_bytes)
    }

    pub fn conversion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.converted as f64 / self.total as f64) * 100.0
        }
    }
}
