//! # Error Types — Validation Taxonomy and Schema Errors
//!
//! Two tiers of failure are modelled here:
//!
//! - [`SchemaError`]: deployment or programming defects: unreadable schema
//!   files, dangling type references, facets that contradict each other, or
//!   a validator used before it was initialized. These abort the operation.
//! - [`ValidationError`]: a mismatch between an input value and its declared
//!   type. These are data, returned in bulk from every validation call so a
//!   caller can report every problem in one response.
//!
//! The [`ErrorCode`] strings are a stable contract: callers match on them
//! (via `forceOnError`) and HTTP clients receive them verbatim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed taxonomy of validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A required property is absent.
    PropertyMissing,
    /// A property not declared by a closed object type.
    PropertyAdditional,
    /// A type name that does not resolve in the collection.
    UnknownType,
    /// Value is not one of the enumerated literals.
    EnumInvalid,
    /// Value is not a boolean.
    TypeBoolInvalid,
    /// Value is not an integer.
    TypeIntInvalid,
    /// Value is not a number.
    TypeNumbInvalid,
    /// Number is below `minimum`.
    TypeNumbTooSmall,
    /// Number is above `maximum`.
    TypeNumbTooLarge,
    /// Value is not a string.
    TypeStringInvalid,
    /// String is shorter than `minLength`.
    TypeStringTooShort,
    /// String is longer than `maxLength`.
    TypeStringTooLong,
    /// String does not match `pattern`.
    TypeStringBadPattern,
    /// Value is not a `YYYY-MM-DD` date.
    TypeDateOnlyInvalid,
    /// Value is not a `HH:MM:SS` time.
    TypeTimeOnlyInvalid,
    /// Value is not a `YYYY-MM-DDTHH:MM:SS` local date-time.
    TypeDateTimeOnlyInvalid,
    /// Value is not a parseable date-time.
    TypeDatetimeInvalid,
    /// Value is not an array.
    TypeArrayInvalid,
    /// Array has fewer than `minItems` elements.
    TypeArrayTooShort,
    /// Array has more than `maxItems` elements.
    TypeArrayTooLong,
    /// Array contains a duplicate under `uniqueItems`.
    TypeArrayUnique,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [ErrorCode; 21] = [
        Self::PropertyMissing,
        Self::PropertyAdditional,
        Self::UnknownType,
        Self::EnumInvalid,
        Self::TypeBoolInvalid,
        Self::TypeIntInvalid,
        Self::TypeNumbInvalid,
        Self::TypeNumbTooSmall,
        Self::TypeNumbTooLarge,
        Self::TypeStringInvalid,
        Self::TypeStringTooShort,
        Self::TypeStringTooLong,
        Self::TypeStringBadPattern,
        Self::TypeDateOnlyInvalid,
        Self::TypeTimeOnlyInvalid,
        Self::TypeDateTimeOnlyInvalid,
        Self::TypeDatetimeInvalid,
        Self::TypeArrayInvalid,
        Self::TypeArrayTooShort,
        Self::TypeArrayTooLong,
        Self::TypeArrayUnique,
    ];

    /// The wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PropertyMissing => "PROPERTY_MISSING",
            Self::PropertyAdditional => "PROPERTY_ADDITIONAL",
            Self::UnknownType => "UNKNOWN_TYPE",
            Self::EnumInvalid => "ENUM_INVALID",
            Self::TypeBoolInvalid => "TYPE_BOOL_INVALID",
            Self::TypeIntInvalid => "TYPE_INT_INVALID",
            Self::TypeNumbInvalid => "TYPE_NUMB_INVALID",
            Self::TypeNumbTooSmall => "TYPE_NUMB_TOO_SMALL",
            Self::TypeNumbTooLarge => "TYPE_NUMB_TOO_LARGE",
            Self::TypeStringInvalid => "TYPE_STRING_INVALID",
            Self::TypeStringTooShort => "TYPE_STRING_TOO_SHORT",
            Self::TypeStringTooLong => "TYPE_STRING_TOO_LONG",
            Self::TypeStringBadPattern => "TYPE_STRING_BAD_PATTERN",
            Self::TypeDateOnlyInvalid => "TYPE_DATE_ONLY_INVALID",
            Self::TypeTimeOnlyInvalid => "TYPE_TIME_ONLY_INVALID",
            Self::TypeDateTimeOnlyInvalid => "TYPE_DATE_TIME_ONLY_INVALID",
            Self::TypeDatetimeInvalid => "TYPE_DATETIME_INVALID",
            Self::TypeArrayInvalid => "TYPE_ARRAY_INVALID",
            Self::TypeArrayTooShort => "TYPE_ARRAY_TOO_SHORT",
            Self::TypeArrayTooLong => "TYPE_ARRAY_TOO_LONG",
            Self::TypeArrayUnique => "TYPE_ARRAY_UNIQUE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unrecognized error code string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown validation error code: {0:?}")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

/// A single validation failure, serialized to clients as
/// `{"error": CODE, "message": "...", "path": "root -> a -> b[0]"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Machine-readable code.
    pub error: ErrorCode,
    /// Rendered human-readable message.
    pub message: String,
    /// Breadcrumb to the offending value.
    pub path: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.error, self.path, self.message)
    }
}

/// Schema loading and programmer errors. Never produced by bad user input.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema directory or a file inside it could not be read.
    #[error("schema io error for '{path}': {source}")]
    Io {
        /// File or directory being read.
        path: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// A schema file could not be parsed into type definitions.
    #[error("schema parse error in '{file}': {reason}")]
    Parse {
        /// File the definitions came from.
        file: String,
        /// Parser message.
        reason: String,
    },

    /// Two files declare the same type name.
    #[error("type '{type_name}' is declared more than once (second declaration in '{file}')")]
    DuplicateType {
        /// The clashing name.
        type_name: String,
        /// File holding the second declaration.
        file: String,
    },

    /// A custom type name that resolves to nothing.
    #[error("type '{type_name}' references unknown type '{reference}'")]
    UnknownReference {
        /// Type holding the reference.
        type_name: String,
        /// The dangling name.
        reference: String,
    },

    /// A definition whose facets contradict each other.
    #[error("type '{type_name}' is inconsistent: {reason}")]
    Inconsistent {
        /// The offending type.
        type_name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The validator was used before schemas were loaded.
    #[error("schema validator is not initialized")]
    NotInitialized,

    /// `initialize` was called on an already-initialized registry.
    #[error("schema validator is already initialized")]
    AlreadyInitialized,
}
