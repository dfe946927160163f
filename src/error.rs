//! Error types for formgate.

use crate::core::FieldId;
use std::fmt;

/// Result type alias for formgate operations.
pub type Result<T> = std::result::Result<T, FormError>;

/// Errors that can occur when building validators or loading form settings.
///
/// Invalid user input is never reported through this type. A rejected value is
/// an ordinary [`Rejection`] carried inside a validation outcome.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// No UI element exists for the field a validator was built for.
    #[error("Failed to get element {field}.")]
    Binding {
        /// The field whose element could not be found
        field: FieldId,
    },

    /// Failed to load form settings from a source.
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// Failed to deserialize form settings.
    #[error("Failed to deserialize settings: {0}")]
    DeserializationError(String),

    /// A field set was asked to validate a field it has no validator for.
    #[error("Unknown field: {0}")]
    UnknownField(FieldId),

    /// The same field id appears more than once in the form settings.
    #[error("Duplicate field: {0}")]
    DuplicateField(FieldId),

    /// A field entry in the form settings cannot be used.
    #[error("Invalid field {field}: {reason}")]
    InvalidField {
        /// The field's id, or its position when the entry has no id
        field: String,
        /// What is wrong with the entry
        reason: String,
    },

    /// The settings name a different save control than the context drives.
    #[error("Settings use save control {expected} but the context drives {actual}")]
    SaveControlMismatch {
        /// Save control named by the settings
        expected: String,
        /// Save control the context was built for
        actual: String,
    },

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("Form error: {0}")]
    Other(String),
}

impl FormError {
    /// Create a binding error for a field.
    pub fn binding(field: impl Into<FieldId>) -> Self {
        Self::Binding {
            field: field.into(),
        }
    }
}

/// The user-facing reason a field value was rejected.
///
/// This is the expected, non-fatal outcome of validating bad input. The same
/// message is rendered inline beside the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    message: String,
}

impl Rejection {
    /// Create a rejection with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message shown to the user.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_message() {
        let err = FormError::binding("notion-key");
        assert_eq!(err.to_string(), "Failed to get element notion-key.");
    }

    #[test]
    fn test_invalid_field_message() {
        let err = FormError::InvalidField {
            field: "course-code-n".to_string(),
            reason: "no kind given".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid field course-code-n: no kind given");
    }

    #[test]
    fn test_rejection_display() {
        let rejection = Rejection::new("Invalid time zone.");
        assert_eq!(rejection.message(), "Invalid time zone.");
        assert_eq!(rejection.to_string(), "Invalid time zone.");
    }
}
