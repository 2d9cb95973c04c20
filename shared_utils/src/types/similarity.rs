//! Similarity Score Type-Safe Wrapper
//!
//! Normalized MSE similarity lives in [0.0, 1.0], 1.0 meaning pixel-identical.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const SIMILARITY_MIN: f64 = 0.0;
pub const SIMILARITY_MAX: f64 = 1.0;

/// Digits shown in logs and reports.
pub const SIMILARITY_DISPLAY_PRECISION: usize = 4;

// ============================================================================
// SimilarityError
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SimilarityError {
    OutOfRange { value: f64 },
    InvalidFloat,
}

impl fmt::Display for SimilarityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityError::OutOfRange { value } => {
                write!(f, "similarity {:.6} out of range [0.0, 1.0]", value)
            }
            SimilarityError::InvalidFloat => write!(f, "invalid similarity: NaN or Infinity"),
        }
    }
}

impl std::error::Error for SimilarityError {}

// ============================================================================
// Similarity Newtype
// ============================================================================

/// Validated similarity score.
///
/// # Examples
/// ```
/// use shared_utils::types::similarity::Similarity;
///
/// let s = Similarity::new(0.95).unwrap();
/// assert!(s.meets_threshold(0.95));
/// assert!(Similarity::new(1.5).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Similarity(f64);

impl Similarity {
    pub const IDENTICAL: Similarity = Similarity(1.0);

    /// Fail-closed value for anything that could not be compared.
    pub const DISSIMILAR: Similarity = Similarity(0.0);

    pub fn new(value: f64) -> Result<Self, SimilarityError> {
        if value.is_nan() || value.is_infinite() {
            return Err(SimilarityError::InvalidFloat);
        }
        if !(SIMILARITY_MIN..=SIMILARITY_MAX).contains(&value) {
            return Err(SimilarityError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Clamp into range; NaN/Inf become `DISSIMILAR`.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() || value.is_infinite() {
            Self::DISSIMILAR
        } else {
            Self(value.clamp(SIMILARITY_MIN, SIMILARITY_MAX))
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Inclusive on the accept side and exact: no epsilon slack, so a score
    /// one ulp below the threshold is rejected.
    #[inline]
    pub fn meets_threshold(&self, threshold: f64) -> bool {
        self.0 >= threshold
    }

    pub fn display(&self) -> String {
        format!("{:.*}", SIMILARITY_DISPLAY_PRECISION, self.0)
    }

    pub fn as_percent(&self) -> String {
        format!("{:.2}%", self.0 * 100.0)
    }
}

impl fmt::Debug for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Similarity({:.6})", self.0)
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

// ============================================================================
// Tests
// ============================================================================
