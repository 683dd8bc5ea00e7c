//! # Tracing Setup
//!
//! Installs the global `tracing` subscriber described by [`ApiConfig`].

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::{ApiConfig, LogFormat};

/// Build the event filter from the configured directives.
pub fn env_filter(config: &ApiConfig) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid log filter '{}'", config.log_filter))
}

/// Install the global subscriber. Call once, at process start.
pub fn init(config: &ApiConfig) -> anyhow::Result<()> {
    let filter = env_filter(config)?;
    let installed = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
    tracing::info!(format = %config.log_format, filter = %config.log_filter, "tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_directives() {
        let config = ApiConfig {
            log_filter: "info,adx_schema=debug".to_string(),
            ..ApiConfig::default()
        };
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    fn filter_rejects_garbage() {
        let config = ApiConfig {
            log_filter: "adx_schema=loud".to_string(),
            ..ApiConfig::default()
        };
        let err = env_filter(&config).unwrap_err();
        assert!(err.to_string().contains("adx_schema=loud"));
    }
}
