//! # adx-api — Request Validation Layer
//!
//! The HTTP side of schema validation for the ADX deal marketplace. Handlers
//! take [`ValidatedJson`](extractors::ValidatedJson) or
//! [`ValidatedQuery`](extractors::ValidatedQuery) arguments and receive
//! typed, sanitized requests; anything that fails the schema is rejected
//! with `400` and the full error list before the handler runs.
//!
//! ## Architecture
//!
//! - [`config`]: service configuration from YAML with env overrides.
//! - [`telemetry`]: `tracing-subscriber` installation.
//! - [`state`]: shared state holding the loaded validator.
//! - [`error`]: [`AppError`](error::AppError) and its JSON responses.
//! - [`extractors`]: the validating extractors and [`RequestSchema`](extractors::RequestSchema).
//! - [`dto`]: marketplace request types.
//!
//! Route tables, authentication and persistence live in the services that
//! depend on this crate.

pub mod config;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod state;
pub mod telemetry;

pub use config::{ApiConfig, ConfigError, LogFormat};
pub use error::AppError;
pub use extractors::{RequestSchema, ValidatedJson, ValidatedQuery};
pub use state::AppState;
