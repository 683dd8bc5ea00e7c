//! # Schema Validator
//!
//! Recursive structural validation of a `serde_json::Value` against a named
//! type in a [`TypeCollection`].
//!
//! ## Single Pass
//!
//! Validation and normalization happen in the same walk. For each declared
//! property of an object node, in declaration order:
//!
//! 1. fill an absent value from `default` (`fillDefaults`);
//! 2. sanitize strings and coerce numeric/boolean strings;
//! 3. drop explicit `null`s (`removeNull`);
//! 4. validate the property's node;
//! 5. replace a failing value with its `default` and discard its errors
//!    (`forceDefaults`, or `forceOnError` with a matching code).
//!
//! A sanitized value is therefore checked in its sanitized form, and a forced
//! default overrides whatever sanitization produced.
//!
//! ## Error Reporting
//!
//! Bad input never aborts: every independent failure is collected. The
//! exceptions are string and array length facets (first failure ends the
//! leaf's checks) and unions (a total failure reports only the last
//! alternative's errors).

use std::path::Path;

use serde_json::{Map, Value};

use crate::checks::{
    array_facets, as_number, first_duplicate, is_date_only, is_datetime, is_datetime_only,
    is_integer, is_time_only, numeric_facets, parse_bool, parse_bool_str, parse_int, string_facets,
    stringify,
};
use crate::collection::TypeCollection;
use crate::error::{ErrorCode, SchemaError, ValidationError};
use crate::messages::{MessageCatalog, MessageContext};
use crate::options::ValidationOptions;
use crate::types::{TypeName, TypeNode};

/// Label of the outermost value in error paths.
pub const ROOT_PATH: &str = "root";

/// Validates values against a loaded, read-only type collection.
///
/// `SchemaValidator` is `Send + Sync`; share one instance behind an `Arc`
/// for concurrent requests. The only state a call mutates is the value it
/// is handed.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    types: TypeCollection,
    messages: MessageCatalog,
}

impl SchemaValidator {
    /// Validator over an already-built collection with default messages.
    pub fn new(types: TypeCollection) -> Self {
        Self {
            types,
            messages: MessageCatalog::new(),
        }
    }

    /// Load type files and message overrides from a schema directory.
    ///
    /// # Errors
    ///
    /// Any [`SchemaError`] from loading; a malformed schema must abort startup.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let dir = dir.as_ref();
        let types = TypeCollection::load_dir(dir)?;
        let messages = MessageCatalog::load_dir(dir)?;
        Ok(Self { types, messages })
    }

    /// Replace the message catalog.
    pub fn with_messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = messages;
        self
    }

    /// The loaded definitions.
    pub fn types(&self) -> &TypeCollection {
        &self.types
    }

    /// Validate `value` against `type_name`, mutating it as `options` direct.
    ///
    /// Returns an empty list iff the value conforms. An unknown `type_name`
    /// yields a single [`ErrorCode::UnknownType`] error.
    pub fn validate_type(
        &self,
        value: &mut Value,
        type_name: &str,
        options: &ValidationOptions,
    ) -> Vec<ValidationError> {
        self.validate_optional(Some(value), type_name, options)
    }

    /// As [`validate_type`](Self::validate_type), where `None` stands for an
    /// absent value (only an error if the type itself is `required`).
    pub fn validate_optional(
        &self,
        value: Option<&mut Value>,
        type_name: &str,
        options: &ValidationOptions,
    ) -> Vec<ValidationError> {
        let Some(node) = self.types.get(type_name) else {
            tracing::warn!(type_name, "validation requested for unknown type");
            return vec![self.error(
                ErrorCode::UnknownType,
                MessageContext {
                    path: ROOT_PATH,
                    type_name: Some(type_name),
                    ..MessageContext::default()
                },
            )];
        };

        let errors = self.validate_node(value, node, ROOT_PATH, options);
        tracing::debug!(type_name, errors = errors.len(), "validated value");
        errors
    }

    fn validate_node(
        &self,
        value: Option<&mut Value>,
        node: &TypeNode,
        path: &str,
        options: &ValidationOptions,
    ) -> Vec<ValidationError> {
        let Some(value) = value else {
            if node.required {
                return vec![self.error(ErrorCode::PropertyMissing, at(path))];
            }
            return Vec::new();
        };

        let mut errors = Vec::new();

        if let (false, Some(properties), Value::Object(map)) =
            (node.additional_properties, &node.properties, &*value)
        {
            for key in map.keys() {
                if !properties.iter().any(|(name, _)| name == key) {
                    errors.push(self.error(ErrorCode::PropertyAdditional, at(&child_path(path, key))));
                }
            }
        }

        if let Some(properties) = &node.properties {
            for (name, property) in properties {
                let property_path = child_path(path, name);
                let property_errors = match &mut *value {
                    Value::Object(map) => {
                        self.validate_property(map, name, property, &property_path, options)
                    }
                    // Nothing to read properties from: every one is absent.
                    _ => self.validate_node(None, property, &property_path, options),
                };
                errors.extend(property_errors);
            }
        }

        if node.kind != TypeName::Object {
            errors.extend(self.validate_node_type(value, node, path, options));
        }
        errors
    }

    fn validate_property(
        &self,
        map: &mut Map<String, Value>,
        name: &str,
        property: &TypeNode,
        path: &str,
        options: &ValidationOptions,
    ) -> Vec<ValidationError> {
        if options.fill_defaults && !map.contains_key(name) {
            if let Some(default) = &property.default {
                map.insert(name.to_string(), default.clone());
            }
        }

        if let Some(slot) = map.get_mut(name) {
            self.sanitize(slot, property, options);
        }

        if options.remove_null && map.get(name).is_some_and(Value::is_null) {
            map.remove(name);
        }

        let errors = self.validate_node(map.get_mut(name), property, path, options);

        if let Some(default) = &property.default {
            if options.forces(&errors) {
                tracing::debug!(path, errors = errors.len(), "replaced invalid value with default");
                map.insert(name.to_string(), default.clone());
                return Vec::new();
            }
        }
        errors
    }

    /// Apply the sanitizing options to one property value.
    fn sanitize(&self, value: &mut Value, property: &TypeNode, options: &ValidationOptions) {
        let target = self.resolve_alias(property);
        let is_enum = property.is_enum() || target.is_enum();

        if let Value::String(s) = value {
            if options.sanitize_string || (options.sanitize_string_enum && is_enum) {
                *s = s.trim().to_lowercase();
            }
            if options.trim_strings && s.trim().len() != s.len() {
                *s = s.trim().to_string();
            }
        }

        if options.sanitize_integers {
            if let Some(n) = value.as_str().and_then(|s| parse_int(s.trim())) {
                *value = Value::Number(n);
            }
        }

        if options.sanitize_booleans {
            if let Some(b) = value.as_str().and_then(|s| parse_bool_str(s.trim())) {
                *value = Value::Bool(b);
            }
        }
    }

    /// Follow plain `type: OtherName` references to the definition that
    /// decides a value's scalar kind.
    fn resolve_alias<'a>(&'a self, node: &'a TypeNode) -> &'a TypeNode {
        let mut current = node;
        // Alias cycles are rejected at load time.
        for _ in 0..=self.types.len() {
            match &current.kind {
                TypeName::Custom(name) => match self.types.get(name) {
                    Some(next) => current = next,
                    None => break,
                },
                _ => break,
            }
        }
        current
    }

    fn validate_node_type(
        &self,
        value: &mut Value,
        node: &TypeNode,
        path: &str,
        options: &ValidationOptions,
    ) -> Vec<ValidationError> {
        if let Some(allowed) = &node.enum_values {
            let actual = stringify(value);
            if !allowed.iter().any(|candidate| stringify(candidate) == actual) {
                let listed: Vec<_> = allowed.iter().map(stringify).collect();
                return vec![self.error(
                    ErrorCode::EnumInvalid,
                    MessageContext {
                        path,
                        value: Some(&*actual),
                        limit: Some(listed.join(", ").as_str()),
                        type_name: None,
                    },
                )];
            }
        }

        match &node.kind {
            TypeName::Boolean => match parse_bool(value) {
                Some(_) => Vec::new(),
                None => vec![self.invalid(ErrorCode::TypeBoolInvalid, path, value)],
            },
            TypeName::Integer => {
                if !is_integer(value) {
                    return vec![self.invalid(ErrorCode::TypeIntInvalid, path, value)];
                }
                self.numeric_errors(value, node, path)
            }
            TypeName::Number => {
                if as_number(value).is_none() {
                    return vec![self.invalid(ErrorCode::TypeNumbInvalid, path, value)];
                }
                self.numeric_errors(value, node, path)
            }
            TypeName::String => match value.as_str() {
                Some(s) => string_facets(s, node)
                    .map(|(code, limit)| {
                        self.error(
                            code,
                            MessageContext {
                                path,
                                value: Some(s),
                                limit: Some(limit.as_str()),
                                type_name: None,
                            },
                        )
                    })
                    .into_iter()
                    .collect(),
                None => vec![self.invalid(ErrorCode::TypeStringInvalid, path, value)],
            },
            TypeName::DateOnly => self.temporal(value, path, is_date_only, ErrorCode::TypeDateOnlyInvalid),
            TypeName::TimeOnly => self.temporal(value, path, is_time_only, ErrorCode::TypeTimeOnlyInvalid),
            TypeName::DateTimeOnly => {
                self.temporal(value, path, is_datetime_only, ErrorCode::TypeDateTimeOnlyInvalid)
            }
            TypeName::DateTime => self.temporal(value, path, is_datetime, ErrorCode::TypeDatetimeInvalid),
            TypeName::Array => self.validate_array(value, node, path, options),
            TypeName::Union => self.validate_union(value, node, path, options),
            // Objects are checked through their properties.
            TypeName::Any | TypeName::Object => Vec::new(),
            TypeName::Custom(name) => match self.types.get(name) {
                Some(target) => self.validate_node(Some(value), target, path, options),
                None => vec![self.error(
                    ErrorCode::UnknownType,
                    MessageContext {
                        path,
                        type_name: Some(name.as_str()),
                        ..MessageContext::default()
                    },
                )],
            },
        }
    }

    /// `minimum` / `maximum`, shared by `integer` and `number`.
    fn numeric_errors(&self, value: &Value, node: &TypeNode, path: &str) -> Vec<ValidationError> {
        let Some(n) = as_number(value) else {
            return Vec::new();
        };
        let actual = stringify(value);
        numeric_facets(n, node)
            .into_iter()
            .map(|(code, limit)| {
                self.error(
                    code,
                    MessageContext {
                        path,
                        value: Some(&*actual),
                        limit: Some(limit.to_string().as_str()),
                        type_name: None,
                    },
                )
            })
            .collect()
    }

    fn temporal(
        &self,
        value: &Value,
        path: &str,
        accepts: fn(&str) -> bool,
        code: ErrorCode,
    ) -> Vec<ValidationError> {
        match value.as_str() {
            Some(s) if accepts(s) => Vec::new(),
            _ => vec![self.invalid(code, path, value)],
        }
    }

    fn validate_array(
        &self,
        value: &mut Value,
        node: &TypeNode,
        path: &str,
        options: &ValidationOptions,
    ) -> Vec<ValidationError> {
        let items = match value {
            Value::Array(items) => items,
            other => return vec![self.invalid(ErrorCode::TypeArrayInvalid, path, other)],
        };

        if let Some((code, limit)) = array_facets(items.len(), node) {
            return vec![self.error(
                code,
                MessageContext {
                    path,
                    value: Some(items.len().to_string().as_str()),
                    limit: Some(limit.to_string().as_str()),
                    type_name: None,
                },
            )];
        }

        let mut errors = Vec::new();
        if node.unique_items {
            if let Some(duplicate) = first_duplicate(items) {
                errors.push(self.error(
                    ErrorCode::TypeArrayUnique,
                    MessageContext {
                        path,
                        value: Some(duplicate.as_str()),
                        ..MessageContext::default()
                    },
                ));
            }
        }

        if let Some(item_node) = &node.items {
            for (i, item) in items.iter_mut().enumerate() {
                let item_path = format!("{path}[{i}]");
                errors.extend(self.validate_node(Some(item), item_node, &item_path, options));
            }
        }
        errors
    }

    /// First conforming alternative wins; on total failure the last
    /// alternative's errors are reported.
    fn validate_union(
        &self,
        value: &mut Value,
        node: &TypeNode,
        path: &str,
        options: &ValidationOptions,
    ) -> Vec<ValidationError> {
        let mut last = Vec::new();
        for alternative in &node.any_of {
            let errors = self.validate_node(Some(&mut *value), alternative, path, options);
            if errors.is_empty() {
                return Vec::new();
            }
            last = errors;
        }
        last
    }

    fn invalid(&self, code: ErrorCode, path: &str, value: &Value) -> ValidationError {
        let actual = stringify(value);
        self.error(
            code,
            MessageContext {
                path,
                value: Some(&*actual),
                ..MessageContext::default()
            },
        )
    }

    fn error(&self, code: ErrorCode, ctx: MessageContext<'_>) -> ValidationError {
        ValidationError {
            error: code,
            message: self.messages.render(code, &ctx),
            path: ctx.path.to_string(),
        }
    }
}

fn at(path: &str) -> MessageContext<'_> {
    MessageContext {
        path,
        ..MessageContext::default()
    }
}

fn child_path(path: &str, name: &str) -> String {
    format!("{path} -> {name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator(yaml: &str) -> SchemaValidator {
        let types: std::collections::HashMap<String, TypeNode> = serde_yaml::from_str(yaml).unwrap();
        SchemaValidator::new(TypeCollection::from_types(types).unwrap())
    }

    fn codes(errors: &[ValidationError]) -> Vec<ErrorCode> {
        errors.iter().map(|e| e.error).collect()
    }

    const PET: &str = r#"
Pet:
  properties:
    hp:
      type: integer
      minimum: 0
    edible: boolean
"#;

    #[test]
    fn pet_bad_boolean() {
        let v = validator(PET);
        let errors = v.validate_type(&mut json!({"hp": 50, "edible": "goose"}), "Pet", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::TypeBoolInvalid]);
        assert!(errors[0].path.ends_with("-> edible"));
        assert_eq!(errors[0].path, "root -> edible");
    }

    #[test]
    fn pet_bad_integer() {
        let v = validator(PET);
        let errors = v.validate_type(&mut json!({"hp": "30a", "edible": true}), "Pet", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::TypeIntInvalid]);
    }

    #[test]
    fn pet_valid() {
        let v = validator(PET);
        let errors = v.validate_type(&mut json!({"hp": 30, "edible": true}), "Pet", &ValidationOptions::default());
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn integer_runs_number_facets_only_when_integral() {
        let v = validator(PET);
        let errors = v.validate_type(&mut json!({"hp": -3}), "Pet", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::TypeNumbTooSmall]);

        let errors = v.validate_type(&mut json!({"hp": -3.5}), "Pet", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::TypeIntInvalid]);
    }

    #[test]
    fn required_and_optional_absence() {
        let v = validator(
            r#"
Deal:
  properties:
    name: { type: string, required: true }
    notes: string
"#,
        );
        let errors = v.validate_type(&mut json!({}), "Deal", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::PropertyMissing]);
        assert_eq!(errors[0].path, "root -> name");
        assert_eq!(errors[0].message, "root -> name is required");
    }

    #[test]
    fn fill_defaults_populates_absent_properties() {
        let v = validator(
            r#"
Server:
  properties:
    port: { type: integer, default: 80 }
"#,
        );
        let mut value = json!({});
        let opts = ValidationOptions {
            fill_defaults: true,
            ..ValidationOptions::default()
        };
        assert!(v.validate_type(&mut value, "Server", &opts).is_empty());
        assert_eq!(value, json!({"port": 80}));

        let mut untouched = json!({});
        v.validate_type(&mut untouched, "Server", &ValidationOptions::default());
        assert_eq!(untouched, json!({}));
    }

    #[test]
    fn force_on_error_resets_matching_failures() {
        let v = validator(
            r#"
Bid:
  properties:
    priority: { type: integer, maximum: 10, default: 5 }
    weight: { type: integer, maximum: 10, default: 1 }
"#,
        );
        let mut value = json!({"priority": 99, "weight": "heavy"});
        let opts = ValidationOptions {
            force_on_error: vec![ErrorCode::TypeNumbTooLarge],
            ..ValidationOptions::default()
        };
        let errors = v.validate_type(&mut value, "Bid", &opts);
        assert_eq!(value["priority"], json!(5));
        assert_eq!(value["weight"], json!("heavy"));
        assert_eq!(codes(&errors), [ErrorCode::TypeIntInvalid]);
        assert_eq!(errors[0].path, "root -> weight");
    }

    #[test]
    fn force_defaults_resets_any_failure_with_a_default() {
        let v = validator(
            r#"
Bid:
  properties:
    priority: { type: integer, maximum: 10, default: 5 }
    label: { type: string, maxLength: 3 }
"#,
        );
        let mut value = json!({"priority": "high", "label": "too long"});
        let opts = ValidationOptions {
            force_defaults: true,
            ..ValidationOptions::default()
        };
        let errors = v.validate_type(&mut value, "Bid", &opts);
        assert_eq!(value["priority"], json!(5));
        assert_eq!(codes(&errors), [ErrorCode::TypeStringTooLong]);
    }

    #[test]
    fn sanitize_string_enum_normalizes_before_checking() {
        let v = validator(
            r#"
Deal:
  properties:
    status: { type: string, enum: [active, paused] }
"#,
        );
        let mut value = json!({"status": "ACTIVE "});
        let opts = ValidationOptions {
            sanitize_string_enum: true,
            ..ValidationOptions::default()
        };
        assert!(v.validate_type(&mut value, "Deal", &opts).is_empty());
        assert_eq!(value["status"], json!("active"));

        let mut raw = json!({"status": "ACTIVE "});
        let errors = v.validate_type(&mut raw, "Deal", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::EnumInvalid]);
        assert_eq!(raw["status"], json!("ACTIVE "));
    }

    #[test]
    fn sanitize_string_enum_follows_aliases() {
        let v = validator(
            r#"
Status:
  enum: [active, paused]
Deal:
  properties:
    status: Status
    name: string
"#,
        );
        let mut value = json!({"status": " Paused", "name": " Summer Run "});
        let opts = ValidationOptions {
            sanitize_string_enum: true,
            ..ValidationOptions::default()
        };
        assert!(v.validate_type(&mut value, "Deal", &opts).is_empty());
        assert_eq!(value, json!({"status": "paused", "name": " Summer Run "}));
    }

    #[test]
    fn trim_and_lowercase_options() {
        let v = validator(
            r#"
Contact:
  properties:
    email: { type: string, pattern: "^[a-z@.]+$" }
    name: string
"#,
        );
        let mut value = json!({"email": " Ops@Example.com ", "name": "  Dana "});
        let opts = ValidationOptions {
            sanitize_string: true,
            ..ValidationOptions::default()
        };
        assert!(v.validate_type(&mut value, "Contact", &opts).is_empty());
        assert_eq!(value, json!({"email": "ops@example.com", "name": "dana"}));

        let mut value = json!({"email": "ops@example.com", "name": "  Dana "});
        let opts = ValidationOptions {
            trim_strings: true,
            ..ValidationOptions::default()
        };
        assert!(v.validate_type(&mut value, "Contact", &opts).is_empty());
        assert_eq!(value["name"], json!("Dana"));
    }

    #[test]
    fn sanitize_integers_and_booleans_coerce_typed_properties() {
        let v = validator(
            r#"
Query:
  properties:
    page: { type: integer, minimum: 1 }
    archived: boolean
"#,
        );
        let mut value = json!({"page": " 3", "archived": "false"});
        let opts = ValidationOptions {
            sanitize_integers: true,
            sanitize_booleans: true,
            ..ValidationOptions::default()
        };
        assert!(v.validate_type(&mut value, "Query", &opts).is_empty());
        assert_eq!(value, json!({"page": 3, "archived": false}));
    }

    #[test]
    fn sanitize_coerces_whatever_the_declared_type() {
        let v = validator(
            r#"
Q:
  properties:
    meta: any
    ref: string | integer
    flag: any
    zip: string
"#,
        );
        let mut value = json!({"meta": "42", "ref": "7", "flag": "true", "zip": "12345"});
        let opts = ValidationOptions {
            sanitize_integers: true,
            sanitize_booleans: true,
            ..ValidationOptions::default()
        };
        let errors = v.validate_type(&mut value, "Q", &opts);
        assert_eq!(value, json!({"meta": 42, "ref": 7, "flag": true, "zip": 12345}));
        // A coerced string property no longer holds a string.
        assert_eq!(codes(&errors), [ErrorCode::TypeStringInvalid]);
        assert_eq!(errors[0].path, "root -> zip");
    }

    #[test]
    fn integers_wider_than_i64() {
        let v = validator("Big:\n  properties:\n    big: { type: integer, minimum: 0 }\n");
        let mut value = json!({"big": "99999999999999999999"});
        assert!(v.validate_type(&mut value, "Big", &ValidationOptions::default()).is_empty());

        let opts = ValidationOptions {
            sanitize_integers: true,
            ..ValidationOptions::default()
        };
        assert!(v.validate_type(&mut value, "Big", &opts).is_empty());
        assert_eq!(value["big"].as_f64(), Some(1e20));

        let mut negative = json!({"big": "-99999999999999999999"});
        let errors = v.validate_type(&mut negative, "Big", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::TypeNumbTooSmall]);
    }

    #[test]
    fn number_rejects_non_numeric_values() {
        let v = validator("Price: number\n");
        let opts = ValidationOptions::default();
        assert!(v.validate_type(&mut json!(4.5), "Price", &opts).is_empty());
        assert!(v.validate_type(&mut json!("4.5"), "Price", &opts).is_empty());
        for bad in [json!("cheap"), json!(true), json!(null), json!([1])] {
            let errors = v.validate_type(&mut bad.clone(), "Price", &opts);
            assert_eq!(codes(&errors), [ErrorCode::TypeNumbInvalid], "{bad}");
        }
        let errors = v.validate_type(&mut json!("cheap"), "Price", &opts);
        assert_eq!(errors[0].message, "root must be a number, got 'cheap'");
    }

    #[test]
    fn array_rejects_non_arrays() {
        let v = validator("Tags:\n  type: array\n  items: string\n");
        let opts = ValidationOptions::default();
        for bad in [json!("a,b"), json!({"0": "a"}), json!(3)] {
            let errors = v.validate_type(&mut bad.clone(), "Tags", &opts);
            assert_eq!(codes(&errors), [ErrorCode::TypeArrayInvalid], "{bad}");
        }
    }

    #[test]
    fn array_max_items() {
        let v = validator("Tags:\n  type: array\n  maxItems: 2\n  items: integer\n");
        let opts = ValidationOptions::default();
        assert!(v.validate_type(&mut json!([1, 2]), "Tags", &opts).is_empty());
        let errors = v.validate_type(&mut json!([1, 2, "x"]), "Tags", &opts);
        assert_eq!(codes(&errors), [ErrorCode::TypeArrayTooLong]);
        assert_eq!(errors[0].message, "root must contain at most 2 items");
    }

    #[test]
    fn any_accepts_every_value() {
        let v = validator("Blob:\n  properties:\n    data: any\n");
        let opts = ValidationOptions::default();
        for data in [json!(null), json!({"nested": [1, "two"]}), json!("text")] {
            let mut value = json!({"data": data});
            assert!(v.validate_type(&mut value, "Blob", &opts).is_empty(), "{value}");
        }
    }

    #[test]
    fn remove_null_drops_optional_nulls() {
        let v = validator(
            r#"
Deal:
  properties:
    notes: string
    name: { type: string, required: true }
"#,
        );
        let mut value = json!({"notes": null, "name": null});
        let errors = v.validate_type(&mut value, "Deal", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::TypeStringInvalid, ErrorCode::TypeStringInvalid]);

        let opts = ValidationOptions {
            remove_null: true,
            ..ValidationOptions::default()
        };
        let errors = v.validate_type(&mut value, "Deal", &opts);
        assert_eq!(codes(&errors), [ErrorCode::PropertyMissing]);
        assert_eq!(errors[0].path, "root -> name");
        assert_eq!(value, json!({}));
    }

    #[test]
    fn additional_properties_rejected_once_per_key() {
        let v = validator(
            r#"
Closed:
  additionalProperties: false
  properties:
    a: integer
"#,
        );
        let errors = v.validate_type(&mut json!({"a": 1, "b": 2}), "Closed", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::PropertyAdditional]);
        assert_eq!(errors[0].path, "root -> b");
    }

    #[test]
    fn union_short_circuits_on_first_match() {
        let v = validator(
            r#"
Target:
  type: union
  anyOf:
    - type: integer
    - type: string
      minLength: 2
"#,
        );
        assert!(v.validate_type(&mut json!("us"), "Target", &ValidationOptions::default()).is_empty());
        assert!(v.validate_type(&mut json!(7), "Target", &ValidationOptions::default()).is_empty());
    }

    #[test]
    fn union_failure_reports_last_alternative_only() {
        let v = validator(
            r#"
Target:
  type: union
  anyOf:
    - type: integer
    - type: string
      minLength: 2
"#,
        );
        let errors = v.validate_type(&mut json!("x"), "Target", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::TypeStringTooShort]);

        let errors = v.validate_type(&mut json!(true), "Target", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::TypeStringInvalid]);
    }

    #[test]
    fn array_uniqueness_reports_once() {
        let v = validator(
            r#"
Ids:
  type: array
  uniqueItems: true
  items: integer
"#,
        );
        let errors = v.validate_type(&mut json!([1, 2, 2, 2]), "Ids", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::TypeArrayUnique]);
    }

    #[test]
    fn array_length_facets_stop_further_checks() {
        let v = validator(
            r#"
Ids:
  type: array
  minItems: 3
  uniqueItems: true
  items: integer
"#,
        );
        let errors = v.validate_type(&mut json!(["a", "a"]), "Ids", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::TypeArrayTooShort]);
    }

    #[test]
    fn array_items_report_indexed_paths() {
        let v = validator(
            r#"
Address:
  properties:
    zip:
      type: array
      items: { type: string, pattern: "^[0-9]{5}$" }
Order:
  properties:
    address: Address
"#,
        );
        let errors = v.validate_type(
            &mut json!({"address": {"zip": ["12345", "1234x", 5]}}),
            "Order",
            &ValidationOptions::default(),
        );
        assert_eq!(
            codes(&errors),
            [ErrorCode::TypeStringBadPattern, ErrorCode::TypeStringInvalid]
        );
        assert_eq!(errors[0].path, "root -> address -> zip[1]");
        assert_eq!(errors[1].path, "root -> address -> zip[2]");
    }

    #[test]
    fn date_only_scenario() {
        let v = validator("Day: date-only\n");
        let opts = ValidationOptions::default();
        assert!(v.validate_type(&mut json!("1859-05-21"), "Day", &opts).is_empty());
        for bad in ["1859-05-89", "1859-05-21 13:49:00"] {
            let errors = v.validate_type(&mut json!(bad), "Day", &opts);
            assert_eq!(codes(&errors), [ErrorCode::TypeDateOnlyInvalid], "{bad}");
        }
    }

    #[test]
    fn temporal_types_reject_non_strings() {
        let v = validator("At: datetime\nClock: time-only\nLocal: datetime-only\n");
        let opts = ValidationOptions::default();
        assert_eq!(
            codes(&v.validate_type(&mut json!(1700000000), "At", &opts)),
            [ErrorCode::TypeDatetimeInvalid]
        );
        assert_eq!(
            codes(&v.validate_type(&mut json!("7pm"), "Clock", &opts)),
            [ErrorCode::TypeTimeOnlyInvalid]
        );
        assert_eq!(
            codes(&v.validate_type(&mut json!("2024-01-01"), "Local", &opts)),
            [ErrorCode::TypeDateTimeOnlyInvalid]
        );
        assert!(v.validate_type(&mut json!("2024-01-01T08:00:00Z"), "At", &opts).is_empty());
    }

    #[test]
    fn enum_compares_string_forms() {
        let v = validator("Tier:\n  type: integer\n  enum: [1, 2, 3]\n");
        let opts = ValidationOptions::default();
        assert!(v.validate_type(&mut json!(2), "Tier", &opts).is_empty());
        assert!(v.validate_type(&mut json!("2"), "Tier", &opts).is_empty());
        let errors = v.validate_type(&mut json!(4), "Tier", &opts);
        assert_eq!(codes(&errors), [ErrorCode::EnumInvalid]);
        assert_eq!(errors[0].message, "root must be one of [1, 2, 3], got '4'");
    }

    #[test]
    fn unknown_type_name_is_reported_not_thrown() {
        let v = validator(PET);
        let errors = v.validate_type(&mut json!({}), "Dog", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::UnknownType]);
        assert_eq!(errors[0].path, ROOT_PATH);
    }

    #[test]
    fn absent_top_level_value() {
        let v = validator(PET);
        assert!(v.validate_optional(None, "Pet", &ValidationOptions::default()).is_empty());
    }

    #[test]
    fn recursive_types_terminate_on_the_value() {
        let v = validator(
            r#"
Category:
  properties:
    name: { type: string, required: true }
    children: Category[]
"#,
        );
        let mut value = json!({
            "name": "video",
            "children": [
                {"name": "outstream", "children": []},
                {"children": [{"name": "ctv"}]}
            ]
        });
        let errors = v.validate_type(&mut value, "Category", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::PropertyMissing]);
        assert_eq!(errors[0].path, "root -> children[1] -> name");
    }

    #[test]
    fn object_properties_on_non_object_value_are_absent() {
        let v = validator(PET);
        assert!(v.validate_type(&mut json!("not an object"), "Pet", &ValidationOptions::default()).is_empty());

        let strict = validator("Named:\n  properties:\n    name: { type: string, required: true }\n");
        let errors = strict.validate_type(&mut json!(42), "Named", &ValidationOptions::default());
        assert_eq!(codes(&errors), [ErrorCode::PropertyMissing]);
    }

    #[test]
    fn collects_independent_failures() {
        let v = validator(
            r#"
Deal:
  properties:
    name: { type: string, minLength: 3 }
    price: { type: number, minimum: 0 }
    starts: date-only
"#,
        );
        let errors = v.validate_type(
            &mut json!({"name": "x", "price": -1, "starts": "soon"}),
            "Deal",
            &ValidationOptions::default(),
        );
        assert_eq!(
            codes(&errors),
            [
                ErrorCode::TypeStringTooShort,
                ErrorCode::TypeNumbTooSmall,
                ErrorCode::TypeDateOnlyInvalid
            ]
        );
    }

    #[test]
    fn custom_messages_are_used() {
        let v = validator(PET).with_messages(
            MessageCatalog::new().with_template(ErrorCode::TypeBoolInvalid, "{path}: yes or no please"),
        );
        let errors = v.validate_type(&mut json!({"edible": 3}), "Pet", &ValidationOptions::default());
        assert_eq!(errors[0].message, "root -> edible: yes or no please");
    }

    #[test]
    fn validator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaValidator>();
    }
}
