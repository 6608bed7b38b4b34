//! # Timestamps — Instants with Offset-Insensitive Equality
//!
//! `TimestampType` converts between a string wire value and a
//! [`TimestampValue`], an instant in time that remembers the offset it was
//! written with.
//!
//! ## Wire Format
//!
//! RFC 3339: `YYYY-MM-DDTHH:MM:SS[.fraction](Z|±HH:MM)`. Decoding accepts
//! any offset and up to nanosecond fractions. Encoding keeps the original
//! offset, writes `Z` for UTC, and renders the fraction according to the
//! configured [`TimestampPrecision`].
//!
//! ## Equality
//!
//! Two Known timestamps are equal iff they denote the same instant.
//! `2023-01-01T12:00:00Z` and `2023-01-01T07:00:00-05:00` are equal even
//! though neither their strings nor their offsets match.
//!
//! ## Plan Modification
//!
//! When the prior and proposed values are the same instant, the prior wire
//! value is kept, so a change of offset alone never shows up as a diff.

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tfx_core::{
    DecodeError, Diagnostic, Diagnostics, DomainValue, EncodeError, ModifyError, PlanModifier,
    TextFormat, ValueType, WireType, WireValue,
};

/// Name used in decode and encode errors.
const TYPE_NAME: &str = "timestamp";

/// Human-readable layout accepted by [`TimestampType`].
pub const TIMESTAMP_PATTERN: &str = "YYYY-MM-DDTHH:MM:SS[.fraction](Z|±HH:MM)";

/// Fractional-second precision used when encoding.
///
/// Round-tripping is exact only for values representable at the chosen
/// precision. `Auto` is always exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPrecision {
    /// Shortest of 0, 3, 6 or 9 fractional digits that loses nothing.
    #[default]
    Auto,
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl TimestampPrecision {
    fn seconds_format(&self) -> SecondsFormat {
        match self {
            Self::Auto => SecondsFormat::AutoSi,
            Self::Seconds => SecondsFormat::Secs,
            Self::Millis => SecondsFormat::Millis,
            Self::Micros => SecondsFormat::Micros,
            Self::Nanos => SecondsFormat::Nanos,
        }
    }
}

/// The timestamp domain type. Shape: `string`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampType {
    pub precision: TimestampPrecision,
}

impl TimestampType {
    pub fn new(precision: TimestampPrecision) -> Self {
        Self { precision }
    }

    /// Render an instant in the canonical wire form.
    pub fn format(&self, dt: &DateTime<FixedOffset>) -> String {
        dt.to_rfc3339_opts(self.precision.seconds_format(), true)
    }
}

/// A decoded timestamp: a Known instant, Null, or Unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampValue {
    Known(DateTime<FixedOffset>),
    Null,
    Unknown,
}

impl TimestampValue {
    /// The current instant, in UTC.
    pub fn now() -> Self {
        Self::Known(Utc::now().into())
    }

    /// Wrap a `DateTime` in any timezone, keeping its offset.
    pub fn from_datetime<Tz: TimeZone>(dt: DateTime<Tz>) -> Self {
        Self::Known(dt.fixed_offset())
    }

    /// Parse an RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Parse`] carrying chrono's message.
    pub fn from_rfc3339(s: &str) -> Result<Self, DecodeError> {
        parse(s).map(Self::Known)
    }

    /// The Known instant with its original offset.
    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::Known(dt) => Some(dt),
            Self::Null | Self::Unknown => None,
        }
    }

    /// The Known instant converted to UTC.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        self.as_datetime().map(|dt| dt.with_timezone(&Utc))
    }
}

impl DomainValue for TimestampValue {
    fn null() -> Self {
        Self::Null
    }

    fn unknown() -> Self {
        Self::Unknown
    }

    fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => a.timestamp() == b.timestamp()
                && a.timestamp_subsec_nanos() == b.timestamp_subsec_nanos(),
            (Self::Null, Self::Null) | (Self::Unknown, Self::Unknown) => true,
            _ => false,
        }
    }
}

impl PartialEq for TimestampValue {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for TimestampValue {}

impl fmt::Display for TimestampValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Null => f.write_str("null"),
            Self::Unknown => f.write_str("<unknown>"),
        }
    }
}

fn parse(s: &str) -> Result<DateTime<FixedOffset>, DecodeError> {
    DateTime::parse_from_rfc3339(s).map_err(|e| DecodeError::Parse {
        type_name: TYPE_NAME,
        input: s.to_string(),
        reason: e.to_string(),
    })
}

impl ValueType for TimestampType {
    type Value = TimestampValue;

    fn wire_type(&self) -> WireType {
        WireType::String
    }

    fn validate(&self, wire: &WireValue) -> Diagnostics {
        if !wire.is_known() {
            return Diagnostics::new();
        }
        let s = match wire.as_str() {
            Ok(s) => s,
            Err(e) => {
                return Diagnostic::error(
                    "Invalid timestamp",
                    format!(
                        "Timestamps must be readable as strings. The following error occurred \
                         reading this timestamp as a string:\n\n{e}"
                    ),
                )
                .into();
            }
        };
        match DateTime::parse_from_rfc3339(s) {
            Ok(_) => Diagnostics::new(),
            Err(e) => Diagnostic::error(
                "Invalid timestamp format",
                format!(
                    "Timestamps must be in the following format: \"{TIMESTAMP_PATTERN}\" \
                     (RFC 3339, e.g. \"2023-01-01T12:00:00Z\"). The following error was \
                     encountered parsing the timestamp:\n\n{e}"
                ),
            )
            .into(),
        }
    }

    fn describe(&self, format: TextFormat) -> String {
        match format {
            TextFormat::Markdown => format!(
                "Timestamps represent a specific point in time, formatted as \
                 [RFC 3339](https://www.rfc-editor.org/rfc/rfc3339) (`{TIMESTAMP_PATTERN}`), \
                 for example `2023-01-01T12:00:00Z`. Times are **semantically equivalent** and \
                 do not show up in diffs if they are the same point in time expressed in \
                 different timezones."
            ),
            _ => format!(
                "Timestamps represent a specific point in time, formatted as {TIMESTAMP_PATTERN} \
                 (YYYY is the year, MM the month, DD the day, HH the 24-hour hour, MM the minute, \
                 SS the second, an optional fraction of a second, and Z or a ±HH:MM timezone \
                 offset), commonly known as RFC 3339 formatting. Times are semantically \
                 equivalent and do not show up in diffs if they are the same point in time but \
                 in different timezones."
            ),
        }
    }

    fn decode(&self, wire: &WireValue) -> Result<TimestampValue, DecodeError> {
        if wire.is_null() {
            return Ok(TimestampValue::Null);
        }
        if wire.is_unknown() {
            return Ok(TimestampValue::Unknown);
        }
        let s = wire.as_str()?;
        TimestampValue::from_rfc3339(s)
    }

    fn encode(&self, value: &TimestampValue) -> Result<WireValue, EncodeError> {
        Ok(match value {
            TimestampValue::Known(dt) => WireValue::string(self.format(dt)),
            TimestampValue::Null => WireValue::null(WireType::String),
            TimestampValue::Unknown => WireValue::unknown(WireType::String),
        })
    }
}

impl PlanModifier for TimestampType {
    fn modify_plan(
        &self,
        prior: &WireValue,
        proposed: &WireValue,
    ) -> Result<WireValue, ModifyError> {
        let prior_value = self.decode(prior).map_err(ModifyError::Prior)?;
        let proposed_value = self.decode(proposed).map_err(ModifyError::Proposed)?;

        if !prior_value.is_known() || !proposed_value.is_known() {
            return Ok(proposed.clone());
        }
        if prior_value.equals(&proposed_value) {
            tracing::debug!(
                %prior_value,
                %proposed_value,
                "same instant in a different representation, keeping prior value"
            );
            return Ok(prior.clone());
        }
        Ok(proposed.clone())
    }
}
