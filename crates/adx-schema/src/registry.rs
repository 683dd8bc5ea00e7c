//! # Validator Registry
//!
//! Explicit, write-once home for the process-wide [`SchemaValidator`].
//! Using the registry before [`initialize`](SchemaRegistry::initialize) is a
//! detectable [`SchemaError::NotInitialized`], never an implicit load.
//!
//! ```ignore
//! static SCHEMAS: SchemaRegistry = SchemaRegistry::new();
//!
//! SCHEMAS.initialize("schemas")?;
//! let errors = SCHEMAS.validate_type(&mut body, "DealProposal", &opts)?;
//! ```

use std::path::Path;
use std::sync::OnceLock;

use serde_json::Value;

use crate::error::{SchemaError, ValidationError};
use crate::options::ValidationOptions;
use crate::validator::SchemaValidator;

/// Write-once holder for a [`SchemaValidator`].
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    validator: OnceLock<SchemaValidator>,
}

impl SchemaRegistry {
    /// An empty, uninitialized registry.
    pub const fn new() -> Self {
        Self {
            validator: OnceLock::new(),
        }
    }

    /// Load the schema directory and install the resulting validator.
    ///
    /// # Errors
    ///
    /// Any load error, or [`SchemaError::AlreadyInitialized`] on a second call.
    pub fn initialize(&self, schema_dir: impl AsRef<Path>) -> Result<&SchemaValidator, SchemaError> {
        if self.validator.get().is_some() {
            return Err(SchemaError::AlreadyInitialized);
        }
        let validator = SchemaValidator::from_dir(schema_dir)?;
        self.install(validator)
    }

    /// Install a validator built elsewhere.
    ///
    /// # Errors
    ///
    /// [`SchemaError::AlreadyInitialized`] if one is already installed.
    pub fn install(&self, validator: SchemaValidator) -> Result<&SchemaValidator, SchemaError> {
        self.validator
            .set(validator)
            .map_err(|_| SchemaError::AlreadyInitialized)?;
        self.get()
    }

    /// Whether a validator is installed.
    pub fn is_initialized(&self) -> bool {
        self.validator.get().is_some()
    }

    /// The installed validator.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotInitialized`] before initialization.
    pub fn get(&self) -> Result<&SchemaValidator, SchemaError> {
        self.validator.get().ok_or(SchemaError::NotInitialized)
    }

    /// [`SchemaValidator::validate_type`] through the registry.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotInitialized`] before initialization. Validation
    /// failures are returned in the `Ok` list.
    pub fn validate_type(
        &self,
        value: &mut Value,
        type_name: &str,
        options: &ValidationOptions,
    ) -> Result<Vec<ValidationError>, SchemaError> {
        Ok(self.get()?.validate_type(value, type_name, options))
    }
}
