//! # Application State
//!
//! Shared state for handlers, passed via the `State` extractor and read by
//! the validating extractors through `FromRef`.

use std::sync::Arc;

use adx_schema::SchemaValidator;
use anyhow::Context;

use crate::config::ApiConfig;

/// Loaded validator plus the configuration it was loaded with.
///
/// Cloning is two `Arc` bumps; the validator is read-only after load.
#[derive(Debug, Clone)]
pub struct AppState {
    pub validator: Arc<SchemaValidator>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Wrap an already-built validator.
    pub fn new(validator: SchemaValidator, config: ApiConfig) -> Self {
        Self {
            validator: Arc::new(validator),
            config: Arc::new(config),
        }
    }

    /// Load the schema directory named by `config`.
    ///
    /// Loading reads and parses every schema file, so it runs on the
    /// blocking pool. A malformed schema directory is a startup failure.
    pub async fn load(config: ApiConfig) -> anyhow::Result<Self> {
        let dir = config.schema_dir.clone();
        let validator = tokio::task::spawn_blocking(move || SchemaValidator::from_dir(dir))
            .await
            .context("schema loading task failed")?
            .with_context(|| {
                format!("failed to load schemas from {}", config.schema_dir.display())
            })?;

        tracing::info!(
            schema_dir = %config.schema_dir.display(),
            types = validator.types().len(),
            "schemas loaded"
        );
        Ok(Self::new(validator, config))
    }
}
