//! # adx-schema — Request Schema Validation
//!
//! Loads the marketplace's named type definitions once at startup and
//! validates request values against them.
//!
//! ## Components
//!
//! - [`TypeCollection`]: every type and trait-derived type from the schema
//!   directory, checked for self-consistency at load and read-only after.
//! - [`SchemaValidator`]: recursive validation of a `serde_json::Value`
//!   against a named type, returning a flat list of [`ValidationError`]s and
//!   optionally sanitizing/defaulting the value in the same pass.
//! - [`ValidationOptions`]: typed side-effect flags.
//! - [`SchemaRegistry`]: write-once holder that reports use before
//!   initialization as an error.
//!
//! ## Crate Policy
//!
//! - Malformed schemas are fatal ([`SchemaError`]); bad input never is.
//! - The [`ErrorCode`] strings are a wire contract and must not change.
//! - No I/O after loading; validation is synchronous and CPU-bound.

pub mod checks;
pub mod collection;
pub mod error;
pub mod messages;
pub mod options;
pub mod registry;
pub mod types;
pub mod validator;

pub use collection::TypeCollection;
pub use error::{ErrorCode, SchemaError, ValidationError};
pub use messages::{MessageCatalog, MessageContext};
pub use options::ValidationOptions;
pub use registry::SchemaRegistry;
pub use types::{TypeName, TypeNode};
pub use validator::{SchemaValidator, ROOT_PATH};
