//! # Attribute Paths
//!
//! Locators into a structured attribute tree, attached to diagnostics so
//! that a human can find the offending value. Paths are plain data: they
//! are built, displayed and compared, never resolved by this crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of an [`AttributePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStep {
    /// A named attribute of an object.
    AttributeName(String),
    /// A string key into a map.
    ElementKeyString(String),
    /// An integer index into a list.
    ElementKeyInt(i64),
}

/// An ordered path of steps from the root of an attribute tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributePath {
    steps: Vec<PathStep>,
}

impl AttributePath {
    /// The empty path, pointing at the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a path at a top-level attribute.
    pub fn root(name: impl Into<String>) -> Self {
        Self::new().with_attribute_name(name)
    }

    /// Extend the path with a named attribute.
    pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.steps.push(PathStep::AttributeName(name.into()));
        self
    }

    /// Extend the path with a map key.
    pub fn with_element_key_string(mut self, key: impl Into<String>) -> Self {
        self.steps.push(PathStep::ElementKeyString(key.into()));
        self
    }

    /// Extend the path with a list index.
    pub fn with_element_key_int(mut self, index: i64) -> Self {
        self.steps.push(PathStep::ElementKeyInt(index));
        self
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("(root)");
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::AttributeName(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathStep::ElementKeyString(key) => write!(f, "[{key:?}]")?,
                PathStep::ElementKeyInt(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
