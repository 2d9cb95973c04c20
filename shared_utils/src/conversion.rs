//! Conversion Outcome & Crash-Safe Replacement
//!
//! Per-file result type plus the write-then-delete primitive that keeps the
//! "original and replacement never both missing" invariant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{ImgError, Result};
use crate::types::FileSize;

// ============================================================================
// Outcome Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No ladder level was both smaller than the original and similar enough.
    NoAcceptableQuality,
    /// The chosen candidate is not smaller than the original (alpha path).
    NotSmaller,
    /// The derived output path is already taken; nothing is overwritten.
    OutputExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoAcceptableQuality => {
                f.write_str("not beneficial (no quality level smaller and similar enough)")
            }
            SkipReason::NotSmaller => f.write_str("not beneficial (output not smaller)"),
            SkipReason::OutputExists => f.write_str("output file already exists"),
        }
    }
}

/// Result of processing one input file. Produced once, folded once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Converted {
        new_path: PathBuf,
        original_size: FileSize,
        new_size: FileSize,
        bytes_saved: FileSize,
        percent_saved: f64,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        reason: String,
    },
}

impl ConversionOutcome {
    pub fn converted(new_path: PathBuf, original_size: FileSize, new_size: FileSize) -> Self {
        ConversionOutcome::Converted {
            new_path,
            original_size,
            new_size,
            bytes_saved: original_size.saturating_sub(new_size),
            percent_saved: new_size.percent_saved(original_size).unwrap_or(0.0),
        }
    }

    pub fn skipped(reason: SkipReason) -> Self {
        ConversionOutcome::Skipped { reason }
    }

    pub fn failed(reason: impl fmt::Display) -> Self {
        ConversionOutcome::Failed {
            reason: reason.to_string(),
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionOutcome::Converted { .. })
    }

    /// One-line description for the per-file progress log.
    pub fn message(&self, input: &Path) -> String {
        let name = crate::common_utils::display_name(input);
        match self {
            ConversionOutcome::Converted {
                percent_saved,
                bytes_saved,
                ..
            } => format!(
                "Converted {}: {:.1}% smaller ({} saved)",
                name, percent_saved, bytes_saved
            ),
            ConversionOutcome::Skipped { reason } => format!("Skipped {}: {}", name, reason),
            ConversionOutcome::Failed { reason } => {
                format!("Failed to convert {}: {}", name, reason)
            }
        }
    }
}

// ============================================================================
// Durable Write + Safe Delete
// ============================================================================

/// Write `bytes` to `target` durably and without clobbering.
///
/// The data goes to a temp file in the same directory, is fsynced, then
/// hard-linked into place (`persist_noclobber`). An existing `target` yields
/// `ErrorKind::AlreadyExists` and is left untouched.
pub fn write_output_durably(target: &Path, bytes: &[u8]) -> Result<()> {
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".img-webp-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    tmp.persist_noclobber(target).map_err(|e| ImgError::IoError(e.error))?;
    sync_parent_dir(dir);
    debug!(path = %target.display(), size = bytes.len(), "Output written");
    Ok(())
}

#[cfg(unix)]
fn sync_parent_dir(dir: &Path) {
    // Makes the new directory entry durable; best effort.
    if let Ok(handle) = File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_dir: &Path) {}

/// Check that `output` exists, is readable and has exactly `expected_size` bytes.
pub fn verify_output_integrity(output: &Path, expected_size: FileSize) -> Result<()> {
    let integrity = |reason: String| ImgError::OutputIntegrity {
        path: output.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(output)
        .map_err(|e| integrity(format!("cannot read output metadata: {}", e)))?;
    if !metadata.is_file() {
        return Err(integrity("output is not a regular file".to_string()));
    }
    if metadata.len() == 0 {
        return Err(integrity("output file is empty (0 bytes)".to_string()));
    }
    if metadata.len() != expected_size.bytes() {
        return Err(integrity(format!(
            "size mismatch: {} on disk, {} expected",
            metadata.len(),
            expected_size.bytes()
        )));
    }

    let mut file = File::open(output).map_err(|e| integrity(format!("cannot open output: {}", e)))?;
    let mut buffer = [0u8; 16];
    let head = buffer.len().min(metadata.len() as usize);
    file.read_exact(&mut buffer[..head])
        .map_err(|e| integrity(format!("cannot read output: {}", e)))?;
    Ok(())
}

/// Remove `input` only if `output` passes [`verify_output_integrity`].
pub fn safe_delete_original(input: &Path, output: &Path, expected_size: FileSize) -> Result<()> {
    if let Err(e) = verify_output_integrity(output, expected_size) {
        warn!(original = %input.display(), "Original file protected: {}", e);
        return Err(e);
    }

    fs::remove_file(input).map_err(|e| {
        warn!(
            original = %input.display(),
            replacement = %output.display(),
            error = %e,
            "Replacement written but original could not be removed; both files now exist"
        );
        ImgError::IoError(io::Error::new(
            e.kind(),
            format!("replacement written to {} but original not removed: {}", output.display(), e),
        ))
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_converted_outcome_math() {
        let outcome = ConversionOutcome::converted(
            PathBuf::from("a.webp"),
            FileSize::from_kb(100),
            FileSize::from_kb(60),
        );
        match outcome {
            ConversionOutcome::Converted {
                bytes_saved,
                percent_saved,
                ..
            } => {
                assert_eq!(bytes_saved, FileSize::from_kb(40));
                assert!((percent_saved - 40.0).abs() < 1e-9);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_skip_reasons_read_as_not_beneficial() {
        assert!(SkipReason::NoAcceptableQuality.to_string().starts_with("not beneficial"));
        assert!(SkipReason::NotSmaller.to_string().starts_with("not beneficial"));
    }

    #[test]
    fn test_outcome_json_is_tagged() {
        let json = serde_json::to_string(&ConversionOutcome::skipped(SkipReason::NotSmaller)).unwrap();
        assert_eq!(json, r#"{"status":"skipped","reason":"not_smaller"}"#);
    }

    #[test]
    fn test_write_output_durably_creates_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out.webp");
        write_output_durably(&target, b"RIFF....WEBP").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"RIFF....WEBP");

        // no temp files left behind
        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_output_durably_never_clobbers() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out.webp");
        fs::write(&target, b"existing").unwrap();

        let err = write_output_durably(&target, b"new").unwrap_err();
        match err {
            ImgError::IoError(e) => assert_eq!(e.kind(), io::ErrorKind::AlreadyExists),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(fs::read(&target).unwrap(), b"existing");
    }

    #[test]
    fn test_write_output_durably_fails_when_parent_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not_a_dir");
        fs::write(&blocker, b"plain file").unwrap();

        let target = blocker.join("out.webp");
        assert!(write_output_durably(&target, b"RIFF").is_err());
        assert_eq!(fs::read(&blocker).unwrap(), b"plain file");
    }

    #[test]
    fn test_safe_delete_failure_leaves_both_files() {
        let temp = TempDir::new().unwrap();
        // remove_file refuses directories, even for root
        let input = temp.path().join("in.jpg");
        fs::create_dir(&input).unwrap();
        let output = temp.path().join("in.webp");
        fs::write(&output, b"webp!").unwrap();

        let err = safe_delete_original(&input, &output, FileSize::new(5)).unwrap_err();
        assert!(matches!(err, ImgError::IoError(_)));
        assert!(err.to_string().contains("original not removed"));
        assert!(input.exists());
        assert_eq!(fs::read(&output).unwrap(), b"webp!");
    }

    #[test]
    fn test_verify_output_integrity() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("o.webp");

        assert!(verify_output_integrity(&output, FileSize::new(3)).is_err());

        fs::write(&output, b"").unwrap();
        assert!(verify_output_integrity(&output, FileSize::new(0)).is_err());

        fs::write(&output, b"abc").unwrap();
        assert!(verify_output_integrity(&output, FileSize::new(3)).is_ok());
        assert!(verify_output_integrity(&output, FileSize::new(4)).is_err());
    }

    #[test]
    fn test_safe_delete_protects_original_on_bad_output() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.jpg");
        let output = temp.path().join("in.webp");
        fs::write(&input, b"original").unwrap();

        assert!(safe_delete_original(&input, &output, FileSize::new(5)).is_err());
        assert!(input.exists());

        fs::write(&output, b"short").unwrap();
        safe_delete_original(&input, &output, FileSize::new(5)).unwrap();
        assert!(!input.exists());
        assert!(output.exists());
    }
}
