//! Type-Safe Wrappers Module
//!
//! Range checks lifted from comments into the type system.
//!
//! ## Modules
//! - `file_size`: byte counts with saturating arithmetic
//! - `quality`: encoder quality in 0..=100
//! - `similarity`: normalized similarity score in [0, 1]

pub mod file_size;
pub mod quality;
pub mod similarity;

pub use file_size::FileSize;
pub use quality::{Quality, QualityError};
pub use similarity::{Similarity, SimilarityError};

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // ========================================================================
    // Similarity::new accepts exactly the closed unit interval.
    // ========================================================================
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn similarity_validation_property(value in -2.0f64..2.0f64) {
            let result = Similarity::new(value);
            let in_range = (0.0..=1.0).contains(&value);
            prop_assert_eq!(result.is_ok(), in_range,
                "similarity {} should be {}",
                value,
                if in_range { "valid" } else { "invalid" }
            );
        }

        #[test]
        fn similarity_clamped_always_in_range(value in proptest::num::f64::ANY) {
            let s = Similarity::clamped(value);
            prop_assert!((0.0..=1.0).contains(&s.value()));
        }
    }

    // ========================================================================
    // Quality::new accepts exactly 0..=100.
    // ========================================================================
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn quality_validation_property(value in 0u32..1000) {
            prop_assert_eq!(Quality::new(value).is_ok(), value <= 100);
        }
    }

    // ========================================================================
    // FileSize subtraction saturates at zero; savings percent never exceeds 100.
    // ========================================================================
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn file_size_saturating_sub_property(a in 0u64..u64::MAX/2, b in 0u64..u64::MAX/2) {
            let result = FileSize::new(a).saturating_sub(FileSize::new(b));
            if b > a {
                prop_assert_eq!(result.bytes(), 0);
            } else {
                prop_assert_eq!(result.bytes(), a - b);
            }
        }

        #[test]
        fn file_size_percent_saved_property(output in 0u64..1_000_000, original in 1u64..1_000_000) {
            let pct = FileSize::new(output).percent_saved(FileSize::new(original));
            prop_assert!(pct.is_some());
            prop_assert!(pct.unwrap_or(f64::NAN) <= 100.0);
        }
    }
}
