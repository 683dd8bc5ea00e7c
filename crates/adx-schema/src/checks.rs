//! # Scalar and Facet Checks
//!
//! Leaf-level predicates used by the validator. Everything here is pure:
//! no mutation and no error construction, just answers about a value.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::{Number, Value};

use crate::error::ErrorCode;
use crate::types::TypeNode;

/// String form of a value for enum comparison, uniqueness and messages.
/// Strings are taken verbatim; everything else is its compact JSON text.
pub fn stringify(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Native booleans, or the literal strings `"true"` / `"false"`.
pub fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => parse_bool_str(s),
        _ => None,
    }
}

/// `"true"` / `"false"`, case-sensitive.
pub fn parse_bool_str(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Optional sign followed by ASCII digits only.
pub fn is_integer_str(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Strict integer parse of a string. Values outside the `i64`/`u64` range
/// are still integers and come back as the nearest `f64`.
pub fn parse_int(s: &str) -> Option<Number> {
    if !is_integer_str(s) {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        return Some(n.into());
    }
    if let Ok(n) = s.parse::<u64>() {
        return Some(n.into());
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Whether the value is a whole number, natively or in string form.
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        Value::String(s) => is_integer_str(s),
        _ => false,
    }
}

/// Numeric value of a number or a numeric string.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// `minimum` / `maximum` violations. Both bounds are checked independently.
pub fn numeric_facets(n: f64, node: &TypeNode) -> Vec<(ErrorCode, f64)> {
    let mut violations = Vec::new();
    if let Some(min) = node.minimum {
        if n < min {
            violations.push((ErrorCode::TypeNumbTooSmall, min));
        }
    }
    if let Some(max) = node.maximum {
        if n > max {
            violations.push((ErrorCode::TypeNumbTooLarge, max));
        }
    }
    violations
}

/// First string facet violation: length bounds, then pattern.
pub fn string_facets(s: &str, node: &TypeNode) -> Option<(ErrorCode, String)> {
    let len = s.chars().count();
    if let Some(min) = node.min_length {
        if len < min {
            return Some((ErrorCode::TypeStringTooShort, min.to_string()));
        }
    }
    if let Some(max) = node.max_length {
        if len > max {
            return Some((ErrorCode::TypeStringTooLong, max.to_string()));
        }
    }
    if let Some(pattern) = &node.pattern {
        if !pattern.is_match(s) {
            return Some((ErrorCode::TypeStringBadPattern, pattern.as_str().to_string()));
        }
    }
    None
}

/// First array length violation.
pub fn array_facets(len: usize, node: &TypeNode) -> Option<(ErrorCode, usize)> {
    if let Some(min) = node.min_items {
        if len < min {
            return Some((ErrorCode::TypeArrayTooShort, min));
        }
    }
    if let Some(max) = node.max_items {
        if len > max {
            return Some((ErrorCode::TypeArrayTooLong, max));
        }
    }
    None
}

/// The string form of the first element that repeats an earlier one.
pub fn first_duplicate(items: &[Value]) -> Option<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(stringify)
        .find(|s| !seen.insert(s.clone()))
        .map(Cow::into_owned)
}

const DATE_ONLY_SHAPE: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";
const TIME_ONLY_SHAPE: &str = r"^[0-9]{2}:[0-9]{2}:[0-9]{2}$";
const DATETIME_ONLY_SHAPE: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?$";

/// Match `s` against a fixed shape pattern, compiled on first use.
fn has_shape(cell: &'static OnceLock<Option<Regex>>, pattern: &str, s: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

/// `YYYY-MM-DD` naming a real calendar day.
pub fn is_date_only(s: &str) -> bool {
    static SHAPE: OnceLock<Option<Regex>> = OnceLock::new();
    has_shape(&SHAPE, DATE_ONLY_SHAPE, s) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// `HH:MM:SS` naming a real time of day.
pub fn is_time_only(s: &str) -> bool {
    static SHAPE: OnceLock<Option<Regex>> = OnceLock::new();
    has_shape(&SHAPE, TIME_ONLY_SHAPE, s) && NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok()
}

/// `YYYY-MM-DDTHH:MM:SS` with optional fractional seconds and no offset.
pub fn is_datetime_only(s: &str) -> bool {
    static SHAPE: OnceLock<Option<Regex>> = OnceLock::new();
    has_shape(&SHAPE, DATETIME_ONLY_SHAPE, s)
        && NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

/// Any date-time the service understands: RFC 3339, RFC 2822, or a
/// local date-time with `T` or a space separator.
pub fn is_datetime(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
}
