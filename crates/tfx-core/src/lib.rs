//! # tfx-core — Typed Values over a Tri-State Wire
//!
//! This crate is the leaf of the tfx workspace. It defines the contract a
//! domain type must satisfy to be converted to and from a dynamically-typed
//! wire value, together with the plain data the contract speaks in.
//!
//! ## Key Design Principles
//!
//! 1. **Tri-state is a tag, never a payload convention.** `WireState` and
//!    every `DomainValue` are closed enums over Known / Null / Unknown. A
//!    Known payload can never be mistaken for "absent" because of what it
//!    contains.
//!
//! 2. **Two channels, never conflated.** `ValueType::validate` reports
//!    accumulable [`Diagnostics`]; `decode`, `encode` and `modify_plan`
//!    return `Result` and fail only for conditions the caller cannot
//!    recover from locally.
//!
//! 3. **Equality is authored, not derived.** `DomainValue::equals` is a
//!    required method. Structural equality is wrong for values such as
//!    timestamps, where two offsets can denote one instant.
//!
//! 4. **Shapes are immutable.** A `WireValue` carries its `WireType` from
//!    construction to drop; payloads are checked against it on entry.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tfx-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public data types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod contract;
pub mod diagnostics;
pub mod error;
pub mod path;
pub mod text_format;
pub mod wire;

// Re-export primary types for ergonomic imports.
pub use contract::{decode_validated, DomainValue, PlanModifier, ValueType};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{DecodeError, EncodeError, ModifyError};
pub use path::{AttributePath, PathStep};
pub use text_format::TextFormat;
pub use wire::{validate_payload, WireError, WireState, WireType, WireValue};
