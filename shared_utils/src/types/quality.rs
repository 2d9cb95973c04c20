//! Encoder Quality Type-Safe Wrapper
//!
//! Lossy WebP quality is an integer in 0..=100 (higher = better, larger).
//! Validated once at construction so the ladder constants cannot drift out
//! of range.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const QUALITY_MIN: u8 = 0;
pub const QUALITY_MAX: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityError {
    OutOfRange { value: u32 },
}

impl fmt::Display for QualityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityError::OutOfRange { value } => write!(
                f,
                "quality {} out of range [{}, {}]",
                value, QUALITY_MIN, QUALITY_MAX
            ),
        }
    }
}

impl std::error::Error for QualityError {}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    /// Const constructor for ladder tables; out-of-range input fails compilation
    /// when used in a `const` context.
    pub const fn new_const(value: u8) -> Self {
        assert!(value <= QUALITY_MAX, "quality out of range");
        Self(value)
    }

    pub fn new(value: u32) -> Result<Self, QualityError> {
        if value > QUALITY_MAX as u32 {
            return Err(QualityError::OutOfRange { value });
        }
        Ok(Self(value as u8))
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// libwebp takes quality as a float factor.
    #[inline]
    pub fn as_f32(&self) -> f32 {
        self.0 as f32
    }
}

impl fmt::Debug for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quality({})", self.0)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}
