//! # Conformance Reports
//!
//! Failures are collected per check and never abort sibling checks, so one
//! run yields every defect an implementation has. Each failure names the
//! check, the type, and where relevant the expected and observed values.

use std::fmt;

/// One of the three independent conformance checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    /// Known sample survives encode then decode.
    RoundTrip,
    /// Null survives decode then encode.
    Null,
    /// Unknown survives decode then encode.
    Unknown,
}

impl Check {
    /// All checks, in reporting order.
    pub const ALL: [Check; 3] = [Check::RoundTrip, Check::Null, Check::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoundTrip => "test-roundtrip",
            Self::Null => "test-nil",
            Self::Unknown => "test-unknown",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed expectation inside a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    pub check: Check,
    /// Fully qualified name of the type under test.
    pub type_name: &'static str,
    pub message: String,
    pub expected: Option<String>,
    pub observed: Option<String>,
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.check, self.type_name, self.message)?;
        if let Some(expected) = &self.expected {
            write!(f, "\n    expected: {expected}")?;
        }
        if let Some(observed) = &self.observed {
            write!(f, "\n    observed: {observed}")?;
        }
        Ok(())
    }
}

/// Result of running one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub check: Check,
    pub failures: Vec<CheckFailure>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Panic with every failure listed, if there are any.
    ///
    /// Intended for use inside `#[test]` functions.
    pub fn assert_passed(&self) {
        if !self.passed() {
            panic!("{}", render_failures(&self.failures));
        }
    }
}

/// Result of running every check against one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceReport {
    pub type_name: &'static str,
    pub outcomes: Vec<CheckOutcome>,
}

impl ConformanceReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::passed)
    }

    /// Every failure across all checks, in check order.
    pub fn failures(&self) -> impl Iterator<Item = &CheckFailure> {
        self.outcomes.iter().flat_map(|o| o.failures.iter())
    }

    /// The outcome of a specific check, if it was run.
    pub fn outcome(&self, check: Check) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.check == check)
    }

    /// Panic with every failure listed, if there are any.
    pub fn assert_passed(&self) {
        if !self.passed() {
            let failures: Vec<CheckFailure> = self.failures().cloned().collect();
            panic!("{}", render_failures(&failures));
        }
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conformance of {}:", self.type_name)?;
        for outcome in &self.outcomes {
            let status = if outcome.passed() { "ok" } else { "FAILED" };
            write!(f, "\n  {} ... {status}", outcome.check)?;
            for failure in &outcome.failures {
                write!(f, "\n    {}", failure.message)?;
            }
        }
        Ok(())
    }
}

fn render_failures(failures: &[CheckFailure]) -> String {
    let mut out = format!("{} conformance failure(s):", failures.len());
    for failure in failures {
        out.push_str("\n  ");
        out.push_str(&failure.to_string());
    }
    out
}
