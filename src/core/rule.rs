//! Validation rules.
//!
//! A rule is plain data: a type predicate, a label used in error text, a policy
//! for empty input, the shape the input must have, and whether accepted values
//! are cached. Every field variant is a different combination of these.

use crate::core::input::RawInput;
use crate::core::predicate::TypePredicate;
use crate::error::Rejection;
use serde_json::Value;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Message for an empty required field.
pub const EMPTY_REQUIRED: &str = "Required field cannot be empty!";
/// Message for text that is not valid JSON.
pub const INVALID_JSON: &str = "Input is not valid JSON.";
/// Message for JSON that is not a plain object.
pub const NOT_AN_OBJECT: &str = "Input must be an object {}.";
/// Message for an unrecognised time-zone name.
pub const INVALID_TIME_ZONE: &str = "Invalid time zone.";

/// What a rule does with an empty input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyPolicy {
    /// Hand the empty input (`null`) to the predicate like any other value.
    Check,
    /// Accept with the null value.
    AcceptNull,
    /// Accept with a fixed replacement value.
    AcceptAs(String),
    /// Reject with [`EMPTY_REQUIRED`].
    Reject,
}

/// The structure a non-empty input must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// The input itself must satisfy the predicate.
    Scalar,
    /// The input must be a JSON object whose values all satisfy the predicate.
    JsonObject,
    /// The input must satisfy the predicate and name an IANA time zone.
    TimeZone,
}

/// The rule deciding whether a field's raw input is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    predicate: TypePredicate,
    type_label: String,
    on_empty: EmptyPolicy,
    shape: Shape,
    cache_accepted: bool,
}

impl Rule {
    /// Build a rule from its parts.
    pub fn new(
        predicate: TypePredicate,
        type_label: impl Into<String>,
        on_empty: EmptyPolicy,
        shape: Shape,
    ) -> Self {
        Self {
            predicate,
            type_label: type_label.into(),
            on_empty,
            shape,
            cache_accepted: false,
        }
    }

    /// An optional string field. Empty input is accepted as null.
    pub fn string() -> Self {
        Self::new(
            TypePredicate::NullableString,
            "string",
            EmptyPolicy::Check,
            Shape::Scalar,
        )
    }

    /// A string field that must not be empty.
    pub fn required_string() -> Self {
        Self::new(TypePredicate::String, "string", EmptyPolicy::Reject, Shape::Scalar)
    }

    /// A field that must hold non-empty numeric text.
    pub fn required_number() -> Self {
        Self::new(
            TypePredicate::ParsableNumber,
            "number",
            EmptyPolicy::Reject,
            Shape::Scalar,
        )
    }

    /// A JSON object whose values are all strings. Empty input becomes `{}`.
    pub fn json_string_object() -> Self {
        Self::new(
            TypePredicate::String,
            "string",
            EmptyPolicy::AcceptAs("{}".to_string()),
            Shape::JsonObject,
        )
    }

    /// A JSON object whose values all come from `allowed`. Empty input becomes `{}`.
    pub fn json_emoji_object(allowed: BTreeSet<String>) -> Self {
        Self::new(
            TypePredicate::one_of(allowed),
            "emoji",
            EmptyPolicy::AcceptAs("{}".to_string()),
            Shape::JsonObject,
        )
    }

    /// An optional IANA time-zone name. Empty input is accepted as null.
    pub fn time_zone() -> Self {
        Self::new(
            TypePredicate::NullableString,
            "string",
            EmptyPolicy::AcceptNull,
            Shape::TimeZone,
        )
    }

    /// Remember every accepted value in the value cache.
    ///
    /// Values substituted for empty input are not cached.
    pub fn cached(mut self) -> Self {
        self.cache_accepted = true;
        self
    }

    /// Whether accepted values are written to the value cache.
    pub fn caches_accepted(&self) -> bool {
        self.cache_accepted
    }

    /// The label used in "Input must be a ..." messages.
    pub fn type_label(&self) -> &str {
        &self.type_label
    }

    /// Decide whether `input` is accepted.
    ///
    /// Returns the semantic value on success. Rejections carry the message
    /// to show next to the field.
    pub fn evaluate(&self, input: &RawInput) -> Result<Option<String>, Rejection> {
        let Some(text) = input.as_str() else {
            return match &self.on_empty {
                EmptyPolicy::Check => self.check_scalar(input),
                EmptyPolicy::AcceptNull => Ok(None),
                EmptyPolicy::AcceptAs(value) => Ok(Some(value.clone())),
                EmptyPolicy::Reject => Err(Rejection::new(EMPTY_REQUIRED)),
            };
        };

        match self.shape {
            Shape::Scalar => self.check_scalar(input),
            Shape::JsonObject => self.check_json_object(text),
            Shape::TimeZone => {
                self.check_scalar(input)?;
                check_time_zone(text)?;
                Ok(Some(text.to_string()))
            }
        }
    }

    fn check_scalar(&self, input: &RawInput) -> Result<Option<String>, Rejection> {
        if self.predicate.test(&input.to_value()) {
            Ok(input.as_str().map(str::to_string))
        } else {
            Err(Rejection::new(format!("Input must be a {}!", self.type_label)))
        }
    }

    /// Numbers outside the `f64` range, unpaired surrogate escapes and nesting
    /// deeper than 128 levels are reported as invalid JSON.
    fn check_json_object(&self, text: &str) -> Result<Option<String>, Rejection> {
        let parsed: Value = serde_json::from_str(text).map_err(|_| Rejection::new(INVALID_JSON))?;

        let Value::Object(members) = parsed else {
            return Err(Rejection::new(NOT_AN_OBJECT));
        };

        if members.values().all(|value| self.predicate.test(value)) {
            Ok(Some(text.to_string()))
        } else {
            Err(Rejection::new(format!("All object values must be {}s!", self.type_label)))
        }
    }
}

fn check_time_zone(name: &str) -> Result<(), Rejection> {
    chrono_tz::Tz::from_str(name)
        .or_else(|_| chrono_tz::Tz::from_str_insensitive(name))
        .map(|_| ())
        .map_err(|_| Rejection::new(INVALID_TIME_ZONE))
}
