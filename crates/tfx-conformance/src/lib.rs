//! # tfx-conformance — Contract Conformance Harness
//!
//! A reusable, type-parametric test suite that proves a
//! [`ValueType`](tfx_core::ValueType) honors the conversion contract.
//!
//! ## Checks
//!
//! - **test-roundtrip** — encode a Known sample, check the wire value
//!   against the shape and the type's own validation, decode it, and
//!   compare with the sample using [`DomainValue::equals`](tfx_core::DomainValue::equals).
//! - **test-nil** — decode a Null wire value, re-encode, expect Null.
//! - **test-unknown** — decode an Unknown wire value, re-encode, expect
//!   Unknown (not Null, not Known).
//!
//! Failures are recorded, never thrown, so one run reports every defect.
//!
//! ## Usage
//!
//! ```ignore
//! tfx_conformance::conformance_tests!(
//!     timestamp_conformance,
//!     TimestampType::default(),
//!     TimestampValue::now()
//! );
//! ```
//!
//! expands to a test module with one `#[test]` per check.

pub mod checks;
pub mod report;

pub use checks::Conformance;
pub use report::{Check, CheckFailure, CheckOutcome, ConformanceReport};

/// Generate a test module binding a type and a Known sample to the harness.
///
/// Each check becomes its own `#[test]` so partial failures surface
/// separately. A fourth test runs all checks in parallel.
#[macro_export]
macro_rules! conformance_tests {
    ($name:ident, $ty:expr, $sample:expr $(,)?) => {
        #[cfg(test)]
        mod $name {
            #[allow(unused_imports)]
            use super::*;

            #[test]
            fn test_roundtrip() {
                let ty = $ty;
                $crate::Conformance::new(&ty, $sample).check_roundtrip().assert_passed();
            }

            #[test]
            fn test_nil() {
                let ty = $ty;
                $crate::Conformance::new(&ty, $sample).check_null().assert_passed();
            }

            #[test]
            fn test_unknown() {
                let ty = $ty;
                $crate::Conformance::new(&ty, $sample).check_unknown().assert_passed();
            }

            #[test]
            fn test_all_parallel() {
                let ty = $ty;
                $crate::Conformance::new(&ty, $sample).run_parallel().assert_passed();
            }
        }
    };
}
