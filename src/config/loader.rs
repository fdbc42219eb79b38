//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::registry::validate::{self, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("seed upstream {index} invalid: {source}")]
    Seed {
        index: usize,
        source: ValidationError,
    },
}

/// Load configuration from a TOML file and validate its seed upstreams
/// through the same rules the admin API applies.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;

    for (index, seed) in config.registry.upstreams.iter().enumerate() {
        validate::parse_create_payload(seed)
            .map_err(|source| ConfigError::Seed { index, source })?;
    }

    Ok(config)
}
