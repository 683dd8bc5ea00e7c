//! # Validating Extractors
//!
//! [`ValidatedJson<T>`] and [`ValidatedQuery<T>`] run the schema validator
//! over the raw request value before `T` is deserialized from it:
//!
//! 1. Parse the body / query string into a `serde_json::Value`.
//! 2. `validate_type` against [`RequestSchema::TYPE_NAME`] with the
//!    configured options, sanitizing the value in place.
//! 3. Reject with [`AppError::Validation`] on any error.
//! 4. Deserialize `T` from the sanitized value.
//!
//! ```ignore
//! async fn propose(
//!     ValidatedJson(req): ValidatedJson<DealProposalRequest>,
//! ) -> Result<Json<Deal>, AppError> {
//!     // `req` has passed the `DealProposal` schema.
//! }
//! ```

use std::collections::HashMap;

use adx_schema::ValidationOptions;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRef, FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::state::AppState;

/// A request type backed by a named schema type.
pub trait RequestSchema: DeserializeOwned {
    /// Name of the type in the schema directory.
    const TYPE_NAME: &'static str;

    /// Options to use instead of the configured body/query preset.
    fn options() -> Option<ValidationOptions> {
        None
    }
}

/// Validate `value` as `T`'s schema type and deserialize it.
///
/// `defaults` applies unless `T` overrides [`RequestSchema::options`].
pub fn validate_value<T: RequestSchema>(
    state: &AppState,
    mut value: Value,
    defaults: &ValidationOptions,
) -> Result<T, AppError> {
    let custom = T::options();
    let options = custom.as_ref().unwrap_or(defaults);

    let errors = state.validator.validate_type(&mut value, T::TYPE_NAME, options);
    if !errors.is_empty() {
        tracing::debug!(
            type_name = T::TYPE_NAME,
            errors = errors.len(),
            "request rejected by schema"
        );
        return Err(AppError::Validation(errors));
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(type_name = T::TYPE_NAME, error = %e, "schema-valid request did not map onto its type");
        AppError::BadRequest(e.to_string())
    })
}

/// JSON body validated against `T::TYPE_NAME` using the body options.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: RequestSchema,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|err: JsonRejection| AppError::BadRequest(err.body_text()))?;
        let app = AppState::from_ref(state);
        validate_value(&app, value, &app.config.body_options).map(Self)
    }
}

/// Query string validated against `T::TYPE_NAME` using the query options.
///
/// Every parameter reaches the validator as a string; the query preset's
/// sanitizing options turn numeric and boolean parameters into their typed
/// form before `T` is built.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T> ValidatedQuery<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: RequestSchema,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|err: QueryRejection| AppError::BadRequest(err.body_text()))?;
        let value = Value::Object(
            params
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect::<Map<String, Value>>(),
        );
        let app = AppState::from_ref(state);
        validate_value(&app, value, &app.config.query_options).map(Self)
    }
}
