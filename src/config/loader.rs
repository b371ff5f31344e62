//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{ClientConfig, BASE_URL_ENV};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Base URL cannot be used as a base: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ClientConfig = toml::from_str(&content)?;
    finish(config, std::env::var(BASE_URL_ENV).ok())
}

/// Build configuration from an optional file, falling back to defaults.
///
/// `INTERNAL_API_BASE_URL` overrides `http.base_url` in both cases.
pub fn load_or_default(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => finish(ClientConfig::default(), std::env::var(BASE_URL_ENV).ok()),
    }
}

fn finish(mut config: ClientConfig, base_url: Option<String>) -> Result<ClientConfig, ConfigError> {
    if let Some(base_url) = base_url.filter(|u| !u.trim().is_empty()) {
        tracing::debug!(base_url = %base_url, "Base URL overridden from environment");
        config.http.base_url = base_url;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
