//! # tfx-types — Concrete Domain Types
//!
//! Implementations of the [`tfx_core::ValueType`] contract for domain
//! values that need more than structural conversion.
//!
//! ## Types
//!
//! - [`TimestampType`] / [`TimestampValue`] — RFC 3339 instants. Equality
//!   compares instants, not strings, and [`PlanModifier`](tfx_core::PlanModifier)
//!   keeps the prior value when only the timezone offset changed.
//!
//! ## Crate Policy
//!
//! - Depends only on `tfx-core` internally.
//! - Every type here is bound to the `tfx-conformance` harness in its tests.

pub mod timestamp;

pub use timestamp::{TimestampPrecision, TimestampType, TimestampValue, TIMESTAMP_PATTERN};
