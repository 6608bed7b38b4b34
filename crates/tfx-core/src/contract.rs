//! # Type/Value Contract
//!
//! The interfaces a domain type implements to take part in conversion,
//! validation, description and, optionally, plan modification.
//!
//! ## Round-Trip Law
//!
//! For every type `T` and every value `v` produced by `T::decode`,
//! `T::decode(&T::encode(&v)?)?` must `equals` `v`, in each of the Known,
//! Null and Unknown states. The `tfx-conformance` crate checks this for any
//! implementation.
//!
//! ## Security Invariant
//!
//! Wire values arrive from an untrusted source. `validate` must never panic
//! on them, and `decode` must never coerce Unknown into a concrete payload
//! or the reverse.

use crate::diagnostics::Diagnostics;
use crate::error::{DecodeError, EncodeError, ModifyError};
use crate::text_format::TextFormat;
use crate::wire::{WireType, WireValue};

/// A type-specific in-memory value carrying the tri-state of its origin.
///
/// Implementations are closed enums with a Known variant, a `Null` variant
/// and an `Unknown` variant. At most one state holds at a time.
pub trait DomainValue: std::fmt::Debug + Clone + Send + Sync {
    /// The Null value of this type.
    fn null() -> Self;

    /// The Unknown value of this type.
    fn unknown() -> Self;

    /// True if the value is explicitly absent.
    fn is_null(&self) -> bool;

    /// True if the value is not yet determined.
    fn is_unknown(&self) -> bool;

    /// True if the value is neither Null nor Unknown.
    fn is_known(&self) -> bool {
        !self.is_null() && !self.is_unknown()
    }

    /// Semantic equality under the type's own notion of sameness.
    ///
    /// Two Null values are equal, two Unknown values are equal, and values
    /// in different states are never equal.
    fn equals(&self, other: &Self) -> bool;
}

/// A domain type that converts to and from [`WireValue`]s.
pub trait ValueType: Send + Sync {
    /// The domain value this type decodes into.
    type Value: DomainValue;

    /// The fixed wire shape for this type. Must be stable across calls.
    fn wire_type(&self) -> WireType;

    /// Inspect a wire value and report findings.
    ///
    /// Returns an empty sequence for Null and Unknown input unless the type
    /// has constraints independent of the payload.
    fn validate(&self, wire: &WireValue) -> Diagnostics;

    /// Human-readable description of the type's semantics.
    fn describe(&self, format: TextFormat) -> String;

    /// Convert a wire value into a domain value.
    ///
    /// # Errors
    ///
    /// Must succeed for every wire value `validate` reported no error for.
    fn decode(&self, wire: &WireValue) -> Result<Self::Value, DecodeError>;

    /// Convert a domain value into a wire value of shape [`wire_type`](Self::wire_type).
    fn encode(&self, value: &Self::Value) -> Result<WireValue, EncodeError>;
}

/// A type that can rewrite a proposed value against the prior one.
///
/// Used to suppress changes that are textually different but semantically
/// equal. Must be a pure function of its inputs.
pub trait PlanModifier: ValueType {
    /// Choose the wire value to use as the final proposal.
    ///
    /// Returns `proposed` unchanged when either side is Null or Unknown.
    ///
    /// # Errors
    ///
    /// Forwards a decode failure from either side as [`ModifyError`].
    fn modify_plan(
        &self,
        prior: &WireValue,
        proposed: &WireValue,
    ) -> Result<WireValue, ModifyError>;
}

/// Validate, then decode.
///
/// This is how a schema-driven reader consumes a value: warnings pass
/// through silently, any error-level diagnostic blocks the decode.
///
/// # Errors
///
/// Returns [`DecodeError::Invalid`] carrying every diagnostic when any of
/// them is an error, otherwise whatever `decode` returns.
pub fn decode_validated<T: ValueType + ?Sized>(
    ty: &T,
    wire: &WireValue,
) -> Result<T::Value, DecodeError> {
    let diagnostics = ty.validate(wire);
    if diagnostics.has_error() {
        tracing::debug!(
            wire_type = %ty.wire_type(),
            errors = diagnostics.errors().count(),
            "validation blocked decode"
        );
        return Err(DecodeError::Invalid(diagnostics));
    }
    ty.decode(wire)
}
