//! # Wire Values — Tri-State, Shape-Checked
//!
//! The dynamically-typed side of the conversion contract. A [`WireValue`]
//! pairs a fixed [`WireType`] (its shape) with exactly one [`WireState`]:
//!
//! - `Known(payload)` — a concrete `serde_json::Value` conforming to the shape.
//! - `Null` — explicitly absent.
//! - `Unknown` — not yet determined; resolved in a later evaluation phase.
//!
//! ## Invariants
//!
//! - The shape never changes after construction. There are no setters.
//! - Payload presence is decided by the state tag alone. A Known payload is
//!   checked against the shape on entry, so `Known(Value::Null)` can never
//!   be constructed for a top-level value.
//! - Nested `null` is permitted inside collections and object attributes,
//!   matching how absent elements travel on the wire.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::path::AttributePath;

/// The shape a wire value must conform to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireType {
    String,
    Number,
    Bool,
    /// Homogeneous list of the element shape.
    List(Box<WireType>),
    /// String-keyed map of the element shape.
    Map(Box<WireType>),
    /// Object with exactly the named attributes.
    Object(BTreeMap<String, WireType>),
}

impl WireType {
    pub fn list(element: WireType) -> Self {
        Self::List(Box::new(element))
    }

    pub fn map(element: WireType) -> Self {
        Self::Map(Box::new(element))
    }

    pub fn object<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, WireType)>,
        K: Into<String>,
    {
        Self::Object(attributes.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns true for string, number and bool.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::String | Self::Number | Self::Bool)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Number => f.write_str("number"),
            Self::Bool => f.write_str("bool"),
            Self::List(e) => write!(f, "list({e})"),
            Self::Map(e) => write!(f, "map({e})"),
            Self::Object(attrs) => {
                f.write_str("object({")?;
                for (i, (name, ty)) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                f.write_str("})")
            }
        }
    }
}

/// Error raised at the wire boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// A payload was requested from a Null or Unknown value.
    #[error("cannot read payload of a {state} value")]
    NotKnown {
        /// `"null"` or `"unknown"`.
        state: &'static str,
    },

    /// The payload does not have the kind the shape requires.
    #[error("at {path}: expected {expected}, found {found}")]
    ShapeMismatch {
        path: AttributePath,
        expected: String,
        found: &'static str,
    },

    /// An object payload lacks a declared attribute.
    #[error("at {path}: missing attribute {name:?}")]
    MissingAttribute { path: AttributePath, name: String },

    /// An object payload has an attribute the shape does not declare.
    #[error("at {path}: unexpected attribute {name:?}")]
    UnexpectedAttribute { path: AttributePath, name: String },
}

/// State of a wire value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "payload", rename_all = "snake_case")]
pub enum WireState {
    Known(Value),
    Null,
    Unknown,
}

impl WireState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Known(_) => "known",
            Self::Null => "null",
            Self::Unknown => "unknown",
        }
    }
}

/// A shaped, tri-state wire value.
///
/// Construct with [`WireValue::known`], [`WireValue::null`] or
/// [`WireValue::unknown`]. Deserialization re-checks the payload against
/// the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWireValue")]
pub struct WireValue {
    #[serde(rename = "type")]
    ty: WireType,
    #[serde(flatten)]
    state: WireState,
}

#[derive(Deserialize)]
struct RawWireValue {
    #[serde(rename = "type")]
    ty: WireType,
    #[serde(flatten)]
    state: WireState,
}

impl TryFrom<RawWireValue> for WireValue {
    type Error = WireError;

    fn try_from(raw: RawWireValue) -> Result<Self, Self::Error> {
        match raw.state {
            WireState::Known(payload) => Self::known(raw.ty, payload),
            WireState::Null => Ok(Self::null(raw.ty)),
            WireState::Unknown => Ok(Self::unknown(raw.ty)),
        }
    }
}

impl WireValue {
    /// Create a Known value, checking the payload against the shape.
    ///
    /// # Errors
    ///
    /// Returns the first [`WireError`] found by [`validate_payload`].
    pub fn known(ty: WireType, payload: Value) -> Result<Self, WireError> {
        validate_payload(&ty, &payload)?;
        Ok(Self {
            ty,
            state: WireState::Known(payload),
        })
    }

    /// Create a Known string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self {
            ty: WireType::String,
            state: WireState::Known(Value::String(s.into())),
        }
    }

    pub fn null(ty: WireType) -> Self {
        Self {
            ty,
            state: WireState::Null,
        }
    }

    pub fn unknown(ty: WireType) -> Self {
        Self {
            ty,
            state: WireState::Unknown,
        }
    }

    /// The shape of this value.
    pub fn wire_type(&self) -> &WireType {
        &self.ty
    }

    pub fn state(&self) -> &WireState {
        &self.state
    }

    pub fn is_null(&self) -> bool {
        matches!(self.state, WireState::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.state, WireState::Unknown)
    }

    pub fn is_known(&self) -> bool {
        matches!(self.state, WireState::Known(_))
    }

    /// Borrow the Known payload.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::NotKnown`] for Null and Unknown values.
    pub fn payload(&self) -> Result<&Value, WireError> {
        match &self.state {
            WireState::Known(payload) => Ok(payload),
            other => Err(WireError::NotKnown {
                state: other.as_str(),
            }),
        }
    }

    /// Read the Known payload as a string.
    pub fn as_str(&self) -> Result<&str, WireError> {
        let payload = self.payload()?;
        payload.as_str().ok_or_else(|| mismatch(&AttributePath::new(), &WireType::String, payload))
    }

    /// Read the Known payload as a bool.
    pub fn as_bool(&self) -> Result<bool, WireError> {
        let payload = self.payload()?;
        payload.as_bool().ok_or_else(|| mismatch(&AttributePath::new(), &WireType::Bool, payload))
    }

    /// Read the Known payload as a number.
    pub fn as_number(&self) -> Result<&serde_json::Number, WireError> {
        let payload = self.payload()?;
        match payload {
            Value::Number(n) => Ok(n),
            other => Err(mismatch(&AttributePath::new(), &WireType::Number, other)),
        }
    }

    /// Consume the value and return its state.
    pub fn into_state(self) -> WireState {
        self.state
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            WireState::Known(payload) => write!(f, "{}({payload})", self.ty),
            WireState::Null => write!(f, "{}(null)", self.ty),
            WireState::Unknown => write!(f, "{}(<unknown>)", self.ty),
        }
    }
}

/// Check that a Known payload conforms to a shape.
///
/// The top-level payload must not be JSON `null`; that is what
/// [`WireState::Null`] is for. Elements and attributes nested inside a
/// collection or object may be `null`.
///
/// # Errors
///
/// Returns the first violation found, located by an [`AttributePath`].
pub fn validate_payload(ty: &WireType, payload: &Value) -> Result<(), WireError> {
    validate_at(ty, payload, &AttributePath::new())
}

fn validate_at(ty: &WireType, payload: &Value, path: &AttributePath) -> Result<(), WireError> {
    match (ty, payload) {
        (WireType::String, Value::String(_)) => Ok(()),
        (WireType::Number, Value::Number(_)) => Ok(()),
        (WireType::Bool, Value::Bool(_)) => Ok(()),
        (WireType::List(element), Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                let index = i64::try_from(i).unwrap_or(i64::MAX);
                validate_nested(element, item, &path.clone().with_element_key_int(index))?;
            }
            Ok(())
        }
        (WireType::Map(element), Value::Object(entries)) => {
            for (key, item) in entries {
                validate_nested(element, item, &path.clone().with_element_key_string(key))?;
            }
            Ok(())
        }
        (WireType::Object(attrs), Value::Object(entries)) => {
            for (name, attr_ty) in attrs {
                let item = entries.get(name).ok_or_else(|| WireError::MissingAttribute {
                    path: path.clone(),
                    name: name.clone(),
                })?;
                validate_nested(attr_ty, item, &path.clone().with_attribute_name(name))?;
            }
            if let Some(extra) = entries.keys().find(|k| !attrs.contains_key(*k)) {
                return Err(WireError::UnexpectedAttribute {
                    path: path.clone(),
                    name: extra.clone(),
                });
            }
            Ok(())
        }
        (expected, found) => Err(mismatch(path, expected, found)),
    }
}

fn validate_nested(ty: &WireType, payload: &Value, path: &AttributePath) -> Result<(), WireError> {
    if payload.is_null() {
        return Ok(());
    }
    validate_at(ty, payload, path)
}

fn mismatch(path: &AttributePath, expected: &WireType, found: &Value) -> WireError {
    WireError::ShapeMismatch {
        path: path.clone(),
        expected: expected.to_string(),
        found: json_kind(found),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_string_accepted() {
        let v = WireValue::known(WireType::String, json!("hello")).unwrap();
        assert!(v.is_known());
        assert!(!v.is_null());
        assert!(!v.is_unknown());
        assert_eq!(v.as_str().unwrap(), "hello");
    }

    #[test]
    fn test_known_json_null_rejected() {
        let err = WireValue::known(WireType::String, Value::Null).unwrap_err();
        assert!(matches!(err, WireError::ShapeMismatch { found: "null", .. }));
    }

    #[test]
    fn test_known_wrong_kind_rejected() {
        let err = WireValue::known(WireType::String, json!(42)).unwrap_err();
        assert_eq!(err.to_string(), "at (root): expected string, found number");
    }

    #[test]
    fn test_null_and_unknown_have_no_payload() {
        let null = WireValue::null(WireType::String);
        let unknown = WireValue::unknown(WireType::String);
        assert!(null.is_null());
        assert!(unknown.is_unknown());
        assert_eq!(null.payload().unwrap_err(), WireError::NotKnown { state: "null" });
        assert_eq!(unknown.as_str().unwrap_err(), WireError::NotKnown { state: "unknown" });
    }

    #[test]
    fn test_shape_is_retained() {
        let ty = WireType::list(WireType::Number);
        assert_eq!(WireValue::null(ty.clone()).wire_type(), &ty);
        assert_eq!(WireValue::unknown(ty.clone()).wire_type(), &ty);
    }

    #[test]
    fn test_extraction_mismatch_on_other_shape() {
        let v = WireValue::known(WireType::Number, json!(1.5)).unwrap();
        assert!(v.as_str().is_err());
        assert!(v.as_bool().is_err());
        assert_eq!(v.as_number().unwrap().as_f64(), Some(1.5));
    }

    #[test]
    fn test_list_elements_checked_with_path() {
        let ty = WireType::list(WireType::String);
        assert!(validate_payload(&ty, &json!(["a", null, "c"])).is_ok());
        let err = validate_payload(&ty, &json!(["a", 2])).unwrap_err();
        assert_eq!(err.to_string(), "at [1]: expected string, found number");
    }

    #[test]
    fn test_map_elements_checked() {
        let ty = WireType::map(WireType::Bool);
        assert!(validate_payload(&ty, &json!({"a": true, "b": false})).is_ok());
        assert!(validate_payload(&ty, &json!({"a": "yes"})).is_err());
    }

    #[test]
    fn test_object_attributes_exact() {
        let ty = WireType::object([("name", WireType::String), ("size", WireType::Number)]);
        assert!(validate_payload(&ty, &json!({"name": "x", "size": 3})).is_ok());
        assert!(validate_payload(&ty, &json!({"name": "x", "size": null})).is_ok());

        let missing = validate_payload(&ty, &json!({"name": "x"})).unwrap_err();
        assert!(matches!(missing, WireError::MissingAttribute { ref name, .. } if name == "size"));

        let extra = validate_payload(&ty, &json!({"name": "x", "size": 1, "color": "red"}))
            .unwrap_err();
        assert!(matches!(
            extra,
            WireError::UnexpectedAttribute { ref name, .. } if name == "color"
        ));
    }

    #[test]
    fn test_wire_type_display() {
        let ty = WireType::object([("tags", WireType::list(WireType::String))]);
        assert_eq!(ty.to_string(), "object({tags: list(string)})");
        assert!(WireType::Bool.is_primitive());
        assert!(!ty.is_primitive());
    }

    #[test]
    fn test_wire_value_display() {
        assert_eq!(WireValue::string("x").to_string(), r#"string("x")"#);
        assert_eq!(WireValue::null(WireType::String).to_string(), "string(null)");
        assert_eq!(WireValue::unknown(WireType::Bool).to_string(), "bool(<unknown>)");
    }

    #[test]
    fn test_serde_roundtrip_and_recheck() {
        let v = WireValue::string("2023-01-01T12:00:00Z");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["state"], "known");
        let back: WireValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);

        let unknown: WireValue =
            serde_json::from_value(json!({"type": "string", "state": "unknown"})).unwrap();
        assert!(unknown.is_unknown());

        let bad = serde_json::from_value::<WireValue>(
            json!({"type": "string", "state": "known", "payload": 7}),
        );
        assert!(bad.is_err());
    }
}
