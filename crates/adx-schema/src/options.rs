//! # Validation Options
//!
//! Flags controlling the side effects of a validation pass. Every flag is
//! off by default, in which case validation never touches the input.
//!
//! Options deserialize from the same camelCase keys the schema files use,
//! so presets can live in service configuration:
//!
//! ```yaml
//! fillDefaults: true
//! forceOnError: [TYPE_NUMB_TOO_LARGE, ENUM_INVALID]
//! ```
//!
//! Unknown keys are rejected.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Side-effect flags for [`SchemaValidator::validate_type`](crate::SchemaValidator::validate_type).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Populate absent properties from their `default` before checking them.
    pub fill_defaults: bool,
    /// Replace any property that failed validation with its `default`.
    pub force_defaults: bool,
    /// Replace a failing property with its `default` when one of its errors
    /// carries a listed code.
    pub force_on_error: Vec<ErrorCode>,
    /// Lowercase and trim every string property.
    pub sanitize_string: bool,
    /// Lowercase and trim string properties constrained by an `enum`.
    pub sanitize_string_enum: bool,
    /// Convert integer-looking strings to numbers on numeric properties.
    pub sanitize_integers: bool,
    /// Convert `"true"`/`"false"` to booleans on boolean properties.
    pub sanitize_booleans: bool,
    /// Trim string properties without changing case.
    pub trim_strings: bool,
    /// Delete properties whose value is `null` before checking them.
    pub remove_null: bool,
}

impl ValidationOptions {
    /// Whether a pass with these options is guaranteed not to mutate the input.
    pub fn is_pure(&self) -> bool {
        !(self.fill_defaults
            || self.force_defaults
            || !self.force_on_error.is_empty()
            || self.sanitize_string
            || self.sanitize_string_enum
            || self.sanitize_integers
            || self.sanitize_booleans
            || self.trim_strings
            || self.remove_null)
    }

    /// Whether a failing property should be reset to its default.
    pub(crate) fn forces(&self, errors: &[crate::ValidationError]) -> bool {
        if errors.is_empty() {
            return false;
        }
        self.force_defaults
            || errors
                .iter()
                .any(|e| self.force_on_error.contains(&e.error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_pure() {
        let opts = ValidationOptions::default();
        assert!(opts.is_pure());
        assert!(!ValidationOptions {
            trim_strings: true,
            ..ValidationOptions::default()
        }
        .is_pure());
        assert!(!ValidationOptions {
            force_on_error: vec![ErrorCode::EnumInvalid],
            ..ValidationOptions::default()
        }
        .is_pure());
    }

    #[test]
    fn deserializes_camel_case_presets() {
        let opts: ValidationOptions = serde_yaml::from_str(
            r#"
fillDefaults: true
sanitizeStringEnum: true
forceOnError: [TYPE_NUMB_TOO_LARGE]
"#,
        )
        .unwrap();
        assert!(opts.fill_defaults);
        assert!(opts.sanitize_string_enum);
        assert!(!opts.remove_null);
        assert_eq!(opts.force_on_error, vec![ErrorCode::TypeNumbTooLarge]);
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(serde_yaml::from_str::<ValidationOptions>("sanitizeEverything: true").is_err());
        assert!(serde_yaml::from_str::<ValidationOptions>("forceOnError: [NOPE]").is_err());
    }
}
