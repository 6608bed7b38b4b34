//! Text formats a type description can be rendered in.

use serde::{Deserialize, Serialize};

/// Requested format for [`ValueType::describe`](crate::ValueType::describe).
///
/// Non-exhaustive: implementations outside this crate must carry a fallback
/// arm that returns their default description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TextFormat {
    #[default]
    PlainText = 0,
    Markdown = 1,
}

impl TextFormat {
    /// Look up a format by its numeric code. Unrecognized codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::PlainText),
            1 => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}
