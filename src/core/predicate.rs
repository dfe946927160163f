//! Type predicates: "is this value semantically a T?".
//!
//! Predicates look at a [`serde_json::Value`] so the same check serves a raw
//! field input (`null` or a string) and the members of a JSON object field.

use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A stateless check deciding whether a value has the expected type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypePredicate {
    /// A string or `null`.
    NullableString,
    /// Any string, including the empty string.
    String,
    /// A string that parses as a number.
    ParsableNumber,
    /// A string that is a member of a fixed allow-list.
    OneOf(Arc<BTreeSet<String>>),
}

impl TypePredicate {
    /// Build an allow-list predicate.
    pub fn one_of<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(Arc::new(allowed.into_iter().map(Into::into).collect()))
    }

    /// Apply the predicate.
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Self::NullableString => is_nullable_string(value),
            Self::String => value.is_string(),
            Self::ParsableNumber => value.as_str().is_some_and(parses_as_number),
            Self::OneOf(allowed) => value.as_str().is_some_and(|s| allowed.contains(s)),
        }
    }
}

/// Whether the value is a string or `null`.
pub fn is_nullable_string(value: &Value) -> bool {
    value.is_string() || value.is_null()
}

/// Whether `text` converts to a number other than `NaN` under the JavaScript
/// `Number()` string grammar.
///
/// Surrounding whitespace is ignored and whitespace-only text converts to zero.
/// Accepted forms are signed decimals with optional fraction and exponent,
/// signed `Infinity`, and unsigned `0x`, `0o` and `0b` integers.
pub fn parses_as_number(text: &str) -> bool {
    let trimmed = text.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return true;
    }

    if let Some(digits) = radix_digits(trimmed) {
        let (radix, digits) = digits;
        return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    }

    let unsigned = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);

    unsigned == "Infinity" || is_unsigned_decimal(unsigned)
}

fn radix_digits(text: &str) -> Option<(u32, &str)> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    Some((radix, &text[2..]))
}

fn is_unsigned_decimal(text: &str) -> bool {
    let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
        Some(at) => (&text[..at], Some(&text[at + 1..])),
        None => (text, None),
    };

    let (integer, fraction) = match mantissa.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (mantissa, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if integer.is_empty() && fraction.is_empty() {
        return false;
    }
    if !all_digits(integer) || !all_digits(fraction) {
        return false;
    }

    match exponent {
        None => true,
        Some(exponent) => {
            let digits = exponent
                .strip_prefix('+')
                .or_else(|| exponent.strip_prefix('-'))
                .unwrap_or(exponent);
            !digits.is_empty() && all_digits(digits)
        }
    }
}

fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{B}'
            | '\u{C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}
