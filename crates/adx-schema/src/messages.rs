//! # Message Templates
//!
//! Presentation-only mapping from [`ErrorCode`] to a message template.
//! Templates may use `{path}`, `{value}`, `{limit}` and `{type}`; any other
//! brace group is emitted verbatim. Deployments can override individual
//! templates with a `messages.yaml` (or `messages.json`) next to the type
//! files.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ErrorCode, SchemaError};

/// File names, in lookup order, holding template overrides.
pub const MESSAGE_FILES: [&str; 2] = ["messages.yaml", "messages.json"];

/// Values substituted into a template.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageContext<'a> {
    /// Breadcrumb to the value.
    pub path: &'a str,
    /// The offending value, in string form.
    pub value: Option<&'a str>,
    /// The facet bound that was violated.
    pub limit: Option<&'a str>,
    /// The expected type name.
    pub type_name: Option<&'a str>,
}

/// Code → template lookup with built-in English defaults.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    overrides: HashMap<ErrorCode, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCatalog {
    /// Catalog with only the built-in templates.
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// Replace the template for one code.
    pub fn with_template(mut self, code: ErrorCode, template: impl Into<String>) -> Self {
        self.overrides.insert(code, template.into());
        self
    }

    /// Load overrides from `messages.yaml`/`messages.json` in `dir`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] if the file exists but is not a mapping
    /// of known error codes to strings.
    pub fn load_dir(dir: &Path) -> Result<Self, SchemaError> {
        let mut catalog = Self::new();
        let Some(path) = MESSAGE_FILES.iter().map(|f| dir.join(f)).find(|p| p.is_file()) else {
            return Ok(catalog);
        };

        let content = std::fs::read_to_string(&path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        // serde_yaml accepts the JSON variant too.
        let overrides: HashMap<ErrorCode, String> =
            serde_yaml::from_str(&content).map_err(|e| SchemaError::Parse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;
        tracing::debug!(file = %path.display(), count = overrides.len(), "loaded message templates");
        catalog.overrides.extend(overrides);
        Ok(catalog)
    }

    /// The active template for a code.
    pub fn template(&self, code: ErrorCode) -> &str {
        self.overrides
            .get(&code)
            .map(String::as_str)
            .unwrap_or_else(|| default_template(code))
    }

    /// Render the message for a code.
    pub fn render(&self, code: ErrorCode, ctx: &MessageContext<'_>) -> String {
        let template = self.template(code);
        let mut out = String::with_capacity(template.len() + ctx.path.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open..];
            let Some(close) = after.find('}') else {
                out.push_str(after);
                return out;
            };
            let key = &after[1..close];
            let substitution = match key {
                "path" => Some(ctx.path),
                "value" => ctx.value,
                "limit" => ctx.limit,
                "type" => ctx.type_name,
                _ => None,
            };
            match substitution {
                Some(text) => out.push_str(text),
                None => out.push_str(&after[..=close]),
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out
    }
}

fn default_template(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::PropertyMissing => "{path} is required",
        ErrorCode::PropertyAdditional => "{path} is not an allowed property",
        ErrorCode::UnknownType => "{path} uses unknown type '{type}'",
        ErrorCode::EnumInvalid => "{path} must be one of [{limit}], got '{value}'",
        ErrorCode::TypeBoolInvalid => "{path} must be a boolean, got '{value}'",
        ErrorCode::TypeIntInvalid => "{path} must be an integer, got '{value}'",
        ErrorCode::TypeNumbInvalid => "{path} must be a number, got '{value}'",
        ErrorCode::TypeNumbTooSmall => "{path} must be at least {limit}, got {value}",
        ErrorCode::TypeNumbTooLarge => "{path} must be at most {limit}, got {value}",
        ErrorCode::TypeStringInvalid => "{path} must be a string",
        ErrorCode::TypeStringTooShort => "{path} must be at least {limit} characters long",
        ErrorCode::TypeStringTooLong => "{path} must be at most {limit} characters long",
        ErrorCode::TypeStringBadPattern => "{path} must match pattern {limit}",
        ErrorCode::TypeDateOnlyInvalid => "{path} must be a date (YYYY-MM-DD), got '{value}'",
        ErrorCode::TypeTimeOnlyInvalid => "{path} must be a time (HH:MM:SS), got '{value}'",
        ErrorCode::TypeDateTimeOnlyInvalid => {
            "{path} must be a local date-time (YYYY-MM-DDTHH:MM:SS), got '{value}'"
        }
        ErrorCode::TypeDatetimeInvalid => "{path} must be a date-time, got '{value}'",
        ErrorCode::TypeArrayInvalid => "{path} must be an array",
        ErrorCode::TypeArrayTooShort => "{path} must contain at least {limit} items",
        ErrorCode::TypeArrayTooLong => "{path} must contain at most {limit} items",
        ErrorCode::TypeArrayUnique => "{path} must not contain duplicate items, '{value}' repeats",
    }
}
