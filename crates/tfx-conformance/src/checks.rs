//! # Conformance Checks
//!
//! The three checks are independent. A failure in one never hides or
//! aborts another.
//!
//! Every check reads only from the type and the sample and writes only to
//! its own outcome, so [`Conformance::run_parallel`] can place each on its
//! own thread without coordination.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tfx_core::{validate_payload, DomainValue, ValueType, WireState, WireType, WireValue};

use crate::report::{Check, CheckFailure, CheckOutcome, ConformanceReport};

/// A conformance suite for one [`ValueType`] and a representative Known sample.
pub struct Conformance<'a, T: ValueType> {
    ty: &'a T,
    sample: T::Value,
}

impl<'a, T: ValueType> Conformance<'a, T> {
    /// Create a suite. `sample` must be a Known value of the type.
    pub fn new(ty: &'a T, sample: T::Value) -> Self {
        Self { ty, sample }
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    /// Run all checks one after another.
    ///
    /// A check that panics is reported as a failure of that check; the
    /// remaining checks still run.
    pub fn run(&self) -> ConformanceReport {
        ConformanceReport {
            type_name: self.type_name(),
            outcomes: Check::ALL.into_iter().map(|check| self.run_guarded(check)).collect(),
        }
    }

    /// Run all checks, each on its own scoped thread.
    ///
    /// A check that panics is reported as a failure of that check.
    pub fn run_parallel(&self) -> ConformanceReport {
        let outcomes = std::thread::scope(|s| {
            let handles: Vec<_> = Check::ALL
                .into_iter()
                .map(|check| (check, s.spawn(move || self.run_guarded(check))))
                .collect();
            handles
                .into_iter()
                .map(|(check, handle)| {
                    handle.join().unwrap_or_else(|payload| self.panicked(check, &*payload))
                })
                .collect()
        });
        ConformanceReport {
            type_name: self.type_name(),
            outcomes,
        }
    }

    /// Run one check, turning a panic into a failure carrying the panic message.
    ///
    /// Failures the check recorded before panicking are not kept.
    fn run_guarded(&self, check: Check) -> CheckOutcome {
        panic::catch_unwind(AssertUnwindSafe(|| self.run_check(check)))
            .unwrap_or_else(|payload| self.panicked(check, &*payload))
    }

    fn panicked(&self, check: Check, payload: &(dyn Any + Send)) -> CheckOutcome {
        let mut rec = Recorder {
            check,
            type_name: self.type_name(),
            failures: Vec::new(),
        };
        rec.fail(format!("check panicked: {}", panic_message(payload)));
        rec.finish()
    }

    /// Run a single check by name.
    pub fn run_check(&self, check: Check) -> CheckOutcome {
        match check {
            Check::RoundTrip => self.check_roundtrip(),
            Check::Null => self.check_null(),
            Check::Unknown => self.check_unknown(),
        }
    }

    /// Encode the sample, check the result against the shape, decode it
    /// back and compare with the sample.
    pub fn check_roundtrip(&self) -> CheckOutcome {
        let mut rec = Recorder::new(Check::RoundTrip, self.type_name());
        let ty = self.ty;
        let shape = ty.wire_type();

        let again = ty.wire_type();
        if again != shape {
            rec.fail_diff("wire_type() is not stable across calls", &shape, &again);
        }

        if !self.sample.is_known() {
            rec.fail_diff("sample value must be Known", "known", state_of(&self.sample));
        }

        match ty.encode(&self.sample) {
            Err(e) => rec.fail(format!("error encoding sample {:?}: {e}", self.sample)),
            Ok(encoded) => {
                if encoded.wire_type() != &shape {
                    rec.fail_diff(
                        "encoded value has a different shape",
                        &shape,
                        encoded.wire_type(),
                    );
                }
                match encoded.state() {
                    WireState::Known(payload) => {
                        if let Err(e) = validate_payload(&shape, payload) {
                            rec.fail(format!(
                                "encoded payload {payload} does not conform to {shape}: {e}"
                            ));
                        }
                    }
                    other => rec.fail_diff("encoded sample is not Known", "known", other.as_str()),
                }

                let diagnostics = ty.validate(&encoded);
                if diagnostics.has_error() {
                    rec.fail(format!("encoded value {encoded} fails validation:\n{diagnostics}"));
                }

                match ty.decode(&encoded) {
                    Err(e) => rec.fail(format!("error decoding {encoded}: {e}")),
                    Ok(decoded) => {
                        if !self.sample.equals(&decoded) {
                            rec.fail_diff(
                                "value differs after encode then decode",
                                format!("{:?}", self.sample),
                                format!("{decoded:?}"),
                            );
                        }
                        if ty.wire_type() != shape {
                            rec.fail("wire_type() changed across an encode/decode cycle");
                        }
                    }
                }
            }
        }

        rec.finish()
    }

    /// Decode a Null wire value, re-encode it, and expect Null throughout.
    pub fn check_null(&self) -> CheckOutcome {
        self.check_sentinel(Sentinel {
            check: Check::Null,
            state: "null",
            wire: WireValue::null,
            value: <T::Value as DomainValue>::null,
            wire_is: WireValue::is_null,
            value_is: |v: &T::Value| v.is_null(),
        })
    }

    /// Decode an Unknown wire value, re-encode it, and expect Unknown throughout.
    pub fn check_unknown(&self) -> CheckOutcome {
        self.check_sentinel(Sentinel {
            check: Check::Unknown,
            state: "unknown",
            wire: WireValue::unknown,
            value: <T::Value as DomainValue>::unknown,
            wire_is: WireValue::is_unknown,
            value_is: |v: &T::Value| v.is_unknown(),
        })
    }

    fn check_sentinel(&self, s: Sentinel<T::Value>) -> CheckOutcome {
        let mut rec = Recorder::new(s.check, self.type_name());
        let ty = self.ty;
        let shape = ty.wire_type();
        let wire = (s.wire)(shape.clone());

        let diagnostics = ty.validate(&wire);
        if diagnostics.has_error() {
            rec.fail(format!("{} input reported errors:\n{diagnostics}", s.state));
        }

        match ty.decode(&wire) {
            Err(e) => rec.fail(format!("error decoding {wire}: {e}")),
            Ok(decoded) => {
                if !(s.value_is)(&decoded) {
                    rec.fail_diff(
                        format!("decoding {wire} did not yield a {} value", s.state),
                        s.state,
                        format!("{decoded:?}"),
                    );
                }
                match ty.encode(&decoded) {
                    Err(e) => rec.fail(format!("error encoding {decoded:?}: {e}")),
                    Ok(out) => self.expect_sentinel(&mut rec, &s, &shape, &out, "re-encoding"),
                }
            }
        }

        let direct = (s.value)();
        match ty.encode(&direct) {
            Err(e) => rec.fail(format!("error encoding {direct:?}: {e}")),
            Ok(out) => self.expect_sentinel(&mut rec, &s, &shape, &out, "encoding"),
        }

        rec.finish()
    }

    fn expect_sentinel(
        &self,
        rec: &mut Recorder,
        s: &Sentinel<T::Value>,
        shape: &WireType,
        out: &WireValue,
        step: &str,
    ) {
        if !(s.wire_is)(out) {
            rec.fail_diff(
                format!("{step} a {} value produced the wrong state", s.state),
                s.state,
                out.state().as_str(),
            );
        }
        if out.wire_type() != shape {
            rec.fail_diff(
                format!("{step} a {} value changed its shape", s.state),
                shape,
                out.wire_type(),
            );
        }
    }
}

/// Per-state parameters of the Null and Unknown checks.
struct Sentinel<V> {
    check: Check,
    state: &'static str,
    wire: fn(WireType) -> WireValue,
    value: fn() -> V,
    wire_is: fn(&WireValue) -> bool,
    value_is: fn(&V) -> bool,
}

/// Collects failures for one check.
struct Recorder {
    check: Check,
    type_name: &'static str,
    failures: Vec<CheckFailure>,
}

impl Recorder {
    fn new(check: Check, type_name: &'static str) -> Self {
        tracing::debug!(%check, type_name, "running conformance check");
        Self {
            check,
            type_name,
            failures: Vec::new(),
        }
    }

    fn push(&mut self, message: String, expected: Option<String>, observed: Option<String>) {
        tracing::warn!(
            check = %self.check,
            type_name = self.type_name,
            %message,
            "conformance failure"
        );
        self.failures.push(CheckFailure {
            check: self.check,
            type_name: self.type_name,
            message,
            expected,
            observed,
        });
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.push(message.into(), None, None);
    }

    fn fail_diff(
        &mut self,
        message: impl Into<String>,
        expected: impl Render,
        observed: impl Render,
    ) {
        self.push(message.into(), Some(expected.render()), Some(observed.render()));
    }

    fn finish(self) -> CheckOutcome {
        CheckOutcome {
            check: self.check,
            failures: self.failures,
        }
    }
}

/// Rendering of expected and observed values.
trait Render {
    fn render(&self) -> String;
}

impl Render for &str {
    fn render(&self) -> String {
        (*self).to_string()
    }
}

impl Render for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl Render for &WireType {
    fn render(&self) -> String {
        self.to_string()
    }
}

fn state_of<V: DomainValue>(value: &V) -> &'static str {
    if value.is_null() {
        "null"
    } else if value.is_unknown() {
        "unknown"
    } else {
        "known"
    }
}

/// Text of a panic payload raised by `panic!` or `expect`.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
