//! FileSize Type-Safe Wrapper
//!
//! Byte counts that cannot underflow, plus the savings arithmetic used by
//! the conversion outcome and the summary report.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// FileSize Newtype
// ============================================================================

/// File size in bytes.
///
/// # Examples
/// ```
/// use shared_utils::types::file_size::FileSize;
///
/// let original = FileSize::new(100 * 1024);
/// let converted = FileSize::new(60 * 1024);
/// assert_eq!(original.saturating_sub(converted).bytes(), 40 * 1024);
/// assert_eq!(converted.saturating_sub(original).bytes(), 0);
/// assert_eq!(converted.percent_saved(original), Some(40.0));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSize(u64);

impl FileSize {
    pub const ZERO: FileSize = FileSize(0);

    pub const KB: u64 = 1024;
    pub const MB: u64 = 1024 * 1024;
    pub const GB: u64 = 1024 * 1024 * 1024;

    #[inline]
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn from_kb(kb: u64) -> Self {
        Self(kb * Self::KB)
    }

    /// Size of an in-memory buffer.
    #[inline]
    pub fn of(bytes: &[u8]) -> Self {
        Self(bytes.len() as u64)
    }

    #[inline]
    pub const fn bytes(&self) -> u64 {
        self.0
    }

    /// Returns `FileSize(0)` when `other > self`.
    #[inline]
    pub fn saturating_sub(&self, other: FileSize) -> FileSize {
        FileSize(self.0.saturating_sub(other.0))
    }

    #[inline]
    pub fn saturating_add(&self, other: FileSize) -> FileSize {
        FileSize(self.0.saturating_add(other.0))
    }

    /// Percentage of `original` saved by shrinking to `self`.
    ///
    /// `None` for a zero-byte original; negative when `self` is larger.
    pub fn percent_saved(&self, original: FileSize) -> Option<f64> {
        if original.0 == 0 {
            None
        } else {
            Some((original.0 as f64 - self.0 as f64) / original.0 as f64 * 100.0)
        }
    }

    pub fn display(&self) -> String {
        if self.0 >= Self::GB {
            format!("{:.2} GB", self.0 as f64 / Self::GB as f64)
        } else if self.0 >= Self::MB {
            format!("{:.2} MB", self.0 as f64 / Self::MB as f64)
        } else if self.0 >= Self::KB {
            format!("{:.2} KB", self.0 as f64 / Self::KB as f64)
        } else {
            format!("{} B", self.0)
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl fmt::Debug for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileSize({} = {})", self.0, self.display())
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Default for FileSize {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u64> for FileSize {
    fn from(bytes: u64) -> Self {
        Self::new(bytes)
    }
}

impl From<FileSize> for u64 {
    fn from(size: FileSize) -> Self {
        size.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_size_creation() {
        assert_eq!(FileSize::new(1024).bytes(), 1024);
        assert_eq!(FileSize::from_kb(2).bytes(), 2048);
        assert_eq!(FileSize::of(&[0u8; 10]).bytes(), 10);
    }

    #[test]
    fn test_saturating_sub() {
        let a = FileSize::new(100);
        let b = FileSize::new(30);
        assert_eq!(a.saturating_sub(b).bytes(), 70);
        assert_eq!(b.saturating_sub(a).bytes(), 0);
        assert_eq!(a.saturating_sub(a).bytes(), 0);
    }

    #[test]
    fn test_percent_saved() {
        let original = FileSize::new(1000);
        assert_eq!(FileSize::new(600).percent_saved(original), Some(40.0));
        assert_eq!(FileSize::new(1200).percent_saved(original), Some(-20.0));
        assert_eq!(FileSize::new(1).percent_saved(FileSize::ZERO), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FileSize::new(500).display(), "500 B");
        assert_eq!(FileSize::new(1024).display(), "1.00 KB");
        assert_eq!(FileSize::new(1024 * 1024).display(), "1.00 MB");
        assert_eq!(FileSize::new(1024 * 1024 * 1024).display(), "1.00 GB");
    }
}
