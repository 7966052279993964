//! Configuration loading from disk.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::config::schema::PortalConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PortalConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: PortalConfig = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Semantic checks beyond what serde enforces.
pub fn validate_config(config: &PortalConfig) -> Result<(), ConfigError> {
    config
        .listener
        .bind_address
        .parse::<SocketAddr>()
        .map_err(|e| {
            ConfigError::Invalid(format!(
                "listener.bind_address `{}`: {e}",
                config.listener.bind_address
            ))
        })?;

    let base = Url::parse(&config.upstream.base_url)
        .map_err(|e| ConfigError::Invalid(format!("upstream.base_url: {e}")))?;
    if base.cannot_be_a_base() {
        return Err(ConfigError::Invalid(format!(
            "upstream.base_url `{}` cannot serve as a base URL",
            config.upstream.base_url
        )));
    }

    if config.upstream.api_key.is_empty() {
        return Err(ConfigError::Invalid(
            "upstream.api_key must be set".to_string(),
        ));
    }

    if config.upstream.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "upstream.timeout_secs must be at least 1".to_string(),
        ));
    }

    Ok(())
}
