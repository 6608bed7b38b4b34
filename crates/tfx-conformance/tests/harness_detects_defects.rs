//! # Harness Defect Detection
//!
//! A small integer type with switchable defects. Each defect is the kind of
//! mistake an implementation makes in practice; the harness must flag it in
//! the right check and leave the other checks green.

use serde_json::json;
use tfx_conformance::{conformance_tests, Check, Conformance};
use tfx_core::{
    DecodeError, Diagnostic, Diagnostics, DomainValue, EncodeError, TextFormat, ValueType,
    WireType, WireValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Defect {
    None,
    /// Unknown is decoded as Null.
    UnknownAsNull,
    /// The payload is read before Unknown is special-cased.
    ParsesUnknown,
    /// Encoding drops the lowest bit.
    LossyEncode,
    /// Encoding produces a string instead of a number.
    WrongShape,
    /// Null is decoded as zero.
    NullAsZero,
    /// Decoding Unknown unwraps the missing payload.
    PanicsOnUnknown,
}

struct Counter {
    defect: Defect,
}

#[derive(Debug, Clone, PartialEq)]
enum CounterValue {
    Known(i64),
    Null,
    Unknown,
}

impl DomainValue for CounterValue {
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
        self == other
    }
}

impl ValueType for Counter {
    type Value = CounterValue;

    fn wire_type(&self) -> WireType {
        WireType::Number
    }

    fn validate(&self, wire: &WireValue) -> Diagnostics {
        if !wire.is_known() {
            return Diagnostics::new();
        }
        match wire.as_number() {
            Ok(n) if n.is_i64() => Diagnostics::new(),
            Ok(n) => Diagnostic::error("Invalid counter", format!("{n} is not an integer")).into(),
            Err(e) => Diagnostic::error("Invalid counter", e.to_string()).into(),
        }
    }

    fn describe(&self, _format: TextFormat) -> String {
        "A signed integer counter.".to_string()
    }

    fn decode(&self, wire: &WireValue) -> Result<CounterValue, DecodeError> {
        if self.defect == Defect::ParsesUnknown {
            if wire.is_null() {
                return Ok(CounterValue::Null);
            }
            return read_known(wire);
        }
        if wire.is_null() {
            if self.defect == Defect::NullAsZero {
                return Ok(CounterValue::Known(0));
            }
            return Ok(CounterValue::Null);
        }
        if wire.is_unknown() {
            return match self.defect {
                Defect::UnknownAsNull => Ok(CounterValue::Null),
                Defect::PanicsOnUnknown => {
                    let n = wire.as_number().expect("counter payload");
                    Ok(CounterValue::Known(n.as_i64().unwrap_or(0)))
                }
                _ => Ok(CounterValue::Unknown),
            };
        }
        read_known(wire)
    }

    fn encode(&self, value: &CounterValue) -> Result<WireValue, EncodeError> {
        match value {
            CounterValue::Known(n) => match self.defect {
                Defect::LossyEncode => Ok(WireValue::known(WireType::Number, json!(n & !1))?),
                Defect::WrongShape => Ok(WireValue::string(n.to_string())),
                _ => Ok(WireValue::known(WireType::Number, json!(n))?),
            },
            CounterValue::Null => Ok(WireValue::null(WireType::Number)),
            CounterValue::Unknown if self.defect == Defect::UnknownAsNull => {
                Ok(WireValue::null(WireType::Number))
            }
            CounterValue::Unknown => Ok(WireValue::unknown(WireType::Number)),
        }
    }
}

fn read_known(wire: &WireValue) -> Result<CounterValue, DecodeError> {
    let n = wire.as_number()?;
    n.as_i64().map(CounterValue::Known).ok_or_else(|| DecodeError::Parse {
        type_name: "counter",
        input: n.to_string(),
        reason: "not an integer".to_string(),
    })
}

fn report_for(defect: Defect) -> tfx_conformance::ConformanceReport {
    let ty = Counter { defect };
    Conformance::new(&ty, CounterValue::Known(7)).run()
}

conformance_tests!(counter_conformance, Counter { defect: Defect::None }, CounterValue::Known(42));

#[test]
fn test_correct_type_passes_all_checks() {
    let report = report_for(Defect::None);
    assert!(report.passed(), "{report}");
    assert_eq!(report.outcomes.len(), 3);
    assert!(report.type_name.ends_with("Counter"));
}

#[test]
fn test_parallel_matches_sequential() {
    for defect in [
        Defect::None,
        Defect::UnknownAsNull,
        Defect::LossyEncode,
        Defect::NullAsZero,
        Defect::PanicsOnUnknown,
    ] {
        let ty = Counter { defect };
        let suite = Conformance::new(&ty, CounterValue::Known(7));
        assert_eq!(suite.run(), suite.run_parallel(), "defect {defect:?}");
    }
}

#[test]
fn test_unknown_as_null_fails_only_unknown_check() {
    let report = report_for(Defect::UnknownAsNull);
    assert!(report.outcome(Check::RoundTrip).unwrap().passed());
    assert!(report.outcome(Check::Null).unwrap().passed());
    let unknown = report.outcome(Check::Unknown).unwrap();
    assert!(!unknown.passed());
    assert!(unknown.failures.iter().any(|f| {
        f.expected.as_deref() == Some("unknown") && f.observed.as_deref() == Some("null")
    }));
}

#[test]
fn test_parsing_unknown_is_a_decode_failure() {
    let report = report_for(Defect::ParsesUnknown);
    assert!(report.outcome(Check::RoundTrip).unwrap().passed());
    assert!(report.outcome(Check::Null).unwrap().passed());
    let unknown = report.outcome(Check::Unknown).unwrap();
    assert_eq!(unknown.failures.len(), 1, "{report}");
    assert!(unknown.failures[0].message.starts_with("error decoding number(<unknown>)"));
}

#[test]
fn test_panicking_check_is_reported_and_others_still_run() {
    let report = report_for(Defect::PanicsOnUnknown);
    assert!(report.outcome(Check::RoundTrip).unwrap().passed(), "{report}");
    assert!(report.outcome(Check::Null).unwrap().passed(), "{report}");
    let unknown = report.outcome(Check::Unknown).unwrap();
    assert_eq!(unknown.failures.len(), 1, "{report}");
    let message = &unknown.failures[0].message;
    assert!(message.starts_with("check panicked: "), "{message}");
    assert!(message.contains("counter payload"), "{message}");
    assert!(message.contains("NotKnown"), "{message}");
}

#[test]
fn test_parallel_run_keeps_panic_message() {
    let ty = Counter {
        defect: Defect::PanicsOnUnknown,
    };
    let report = Conformance::new(&ty, CounterValue::Known(7)).run_parallel();
    let unknown = report.outcome(Check::Unknown).unwrap();
    assert_eq!(unknown.failures.len(), 1, "{report}");
    assert!(unknown.failures[0].message.contains("counter payload"));
}

#[test]
fn test_lossy_encode_fails_roundtrip_with_diff() {
    let report = report_for(Defect::LossyEncode);
    let roundtrip = report.outcome(Check::RoundTrip).unwrap();
    assert_eq!(roundtrip.failures.len(), 1, "{report}");
    let failure = &roundtrip.failures[0];
    assert_eq!(failure.check, Check::RoundTrip);
    assert_eq!(failure.expected.as_deref(), Some("Known(7)"));
    assert_eq!(failure.observed.as_deref(), Some("Known(6)"));
    assert!(report.outcome(Check::Null).unwrap().passed());
    assert!(report.outcome(Check::Unknown).unwrap().passed());
}

#[test]
fn test_wrong_shape_reports_every_step() {
    let report = report_for(Defect::WrongShape);
    let messages: Vec<&str> = report
        .outcome(Check::RoundTrip)
        .unwrap()
        .failures
        .iter()
        .map(|f| f.message.as_str())
        .collect();
    assert!(messages.iter().any(|m| m.contains("different shape")), "{messages:?}");
    assert!(messages.iter().any(|m| m.contains("does not conform to number")), "{messages:?}");
    assert!(messages.iter().any(|m| m.contains("fails validation")), "{messages:?}");
    assert!(messages.iter().any(|m| m.starts_with("error decoding")), "{messages:?}");
    assert!(report.outcome(Check::Null).unwrap().passed());
    assert!(report.outcome(Check::Unknown).unwrap().passed());
}

#[test]
fn test_null_as_zero_fails_null_check() {
    let report = report_for(Defect::NullAsZero);
    let null = report.outcome(Check::Null).unwrap();
    assert!(!null.passed());
    assert!(null
        .failures
        .iter()
        .any(|f| f.message.contains("did not yield a null value")));
    assert!(null
        .failures
        .iter()
        .any(|f| f.message.contains("wrong state") && f.observed.as_deref() == Some("known")));
    assert!(report.outcome(Check::Unknown).unwrap().passed());
}

#[test]
fn test_non_known_sample_is_flagged() {
    let ty = Counter { defect: Defect::None };
    let outcome = Conformance::new(&ty, CounterValue::Null).check_roundtrip();
    assert!(outcome.failures.iter().any(|f| {
        f.message == "sample value must be Known" && f.observed.as_deref() == Some("null")
    }));
}

#[test]
#[should_panic(expected = "test-unknown")]
fn test_assert_passed_names_the_check() {
    report_for(Defect::UnknownAsNull).assert_passed();
}
