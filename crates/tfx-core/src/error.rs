//! # Error Types — Conversion Failures
//!
//! Errors are the fatal channel of the contract. They are raised only for
//! conditions the caller cannot recover from locally: a payload the type
//! cannot interpret, or an upstream decode failure that must propagate.
//! Everything else is reported through [`Diagnostics`].
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`.

use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::wire::WireError;

/// Error converting a wire value into a domain value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload could not be read at the wire boundary.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// The payload was read but the type could not interpret it.
    #[error("cannot parse {input:?} as {type_name}: {reason}")]
    Parse {
        /// Name of the domain type being decoded.
        type_name: &'static str,
        /// The offending input.
        input: String,
        /// Underlying parser message.
        reason: String,
    },

    /// Validation reported at least one error-level diagnostic.
    #[error("validation failed:\n{0}")]
    Invalid(Diagnostics),
}

/// Error converting a domain value into a wire value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The produced payload does not conform to the type's shape.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// The domain value could not be formatted.
    #[error("cannot format {type_name}: {reason}")]
    Format {
        /// Name of the domain type being encoded.
        type_name: &'static str,
        /// Reason formatting failed.
        reason: String,
    },
}

/// Error during plan modification. Records which side failed to decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModifyError {
    /// The previously recorded value could not be decoded.
    #[error("prior value: {0}")]
    Prior(DecodeError),

    /// The newly proposed value could not be decoded.
    #[error("proposed value: {0}")]
    Proposed(DecodeError),
}

impl ModifyError {
    /// The underlying decode error, regardless of side.
    pub fn decode_error(&self) -> &DecodeError {
        match self {
            Self::Prior(e) | Self::Proposed(e) => e,
        }
    }
}
