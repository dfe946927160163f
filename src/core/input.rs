//! Field identifiers, raw inputs and validation outcomes.

use crate::error::Rejection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

/// Identifies one form field.
///
/// Used as the key into the validation registry and the value cache, and to
/// look up the field's element in the host document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    /// Create a field id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&FieldId> for FieldId {
    fn from(id: &FieldId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The text a user entered into a field.
///
/// An empty text box is represented by [`RawInput::Empty`], never by an empty
/// string: every conversion from text maps `""` to `Empty`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawInput {
    /// The field holds no text.
    #[default]
    Empty,
    /// The field holds non-empty text.
    Text(String),
}

impl RawInput {
    /// The entered text, or `None` when the field is empty.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Text(text) => Some(text),
        }
    }

    /// Whether the field holds no text.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The input as a JSON value: `null` when empty, a string otherwise.
    pub(crate) fn to_value(&self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Text(text) => Value::String(text.clone()),
        }
    }
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        if text.is_empty() {
            Self::Empty
        } else {
            Self::Text(text.to_string())
        }
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        if text.is_empty() {
            Self::Empty
        } else {
            Self::Text(text)
        }
    }
}

impl<T: Into<RawInput>> From<Option<T>> for RawInput {
    fn from(text: Option<T>) -> Self {
        text.map_or(Self::Empty, Into::into)
    }
}

/// The result of validating one raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The input is legal. `None` is the null value of nullable fields.
    Accepted(Option<String>),
    /// The input is not legal for the field.
    Rejected(Rejection),
}

impl ValidationOutcome {
    /// Whether the input was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The accepted value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Accepted(value) => value.as_deref(),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection, if the input was rejected.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

impl From<std::result::Result<Option<String>, Rejection>> for ValidationOutcome {
    fn from(result: std::result::Result<Option<String>, Rejection>) -> Self {
        match result {
            Ok(value) => Self::Accepted(value),
            Err(rejection) => Self::Rejected(rejection),
        }
    }
}
