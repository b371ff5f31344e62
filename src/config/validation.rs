//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds and timeouts > 0)
//! - Check the base URL is an absolute http(s) URL
//! - Check the service set is complete and free of duplicates
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use url::Url;

use crate::config::schema::{ClientConfig, TEMPLATE_SERVICE, USER_SERVICE};

/// Longest accepted breaker cooldown (30 days).
pub const MAX_RESET_TIMEOUT_SECS: u64 = 30 * 24 * 60 * 60;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.breaker.max_failures == 0 {
        errors.push(ValidationError::new("breaker.max_failures", "must be at least 1"));
    }
    if config.breaker.reset_timeout_secs == 0 {
        errors.push(ValidationError::new("breaker.reset_timeout_secs", "must be at least 1"));
    } else if config.breaker.reset_timeout_secs > MAX_RESET_TIMEOUT_SECS {
        errors.push(ValidationError::new(
            "breaker.reset_timeout_secs",
            format!("must be at most {}", MAX_RESET_TIMEOUT_SECS),
        ));
    }
    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::new("http.request_timeout_secs", "must be at least 1"));
    }

    match Url::parse(&config.http.base_url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::new(
                "http.base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url) if url.cannot_be_a_base() => {
            errors.push(ValidationError::new("http.base_url", "cannot be used as a base URL"));
        }
        Ok(_) => {}
        Err(e) => {
            errors.push(ValidationError::new("http.base_url", format!("invalid URL: {}", e)));
        }
    }

    let names = &config.services.names;
    if names.is_empty() {
        errors.push(ValidationError::new("services.names", "at least one service is required"));
    }
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            errors.push(ValidationError::new("services.names", "service names must not be blank"));
        } else if !seen.insert(name.as_str()) {
            errors.push(ValidationError::new(
                "services.names",
                format!("duplicate service '{}'", name),
            ));
        }
    }
    for required in [USER_SERVICE, TEMPLATE_SERVICE] {
        if !seen.contains(required) {
            errors.push(ValidationError::new(
                "services.names",
                format!("missing built-in service '{}'", required),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClientConfig::default();
        config.breaker.max_failures = 0;
        config.http.request_timeout_secs = 0;
        config.http.base_url = "ftp://example.com".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["breaker.max_failures", "http.request_timeout_secs", "http.base_url"]
        );
    }

    #[test]
    fn test_rejects_duplicate_and_missing_services() {
        let mut config = ClientConfig::default();
        config.services.names = vec![USER_SERVICE.into(), USER_SERVICE.into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("duplicate"));
        assert!(errors[1].message.contains(TEMPLATE_SERVICE));
    }

    #[test]
    fn test_rejects_oversized_reset_timeout() {
        let mut config = ClientConfig::default();
        config.breaker.reset_timeout_secs = u64::MAX;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "breaker.reset_timeout_secs");

        config.breaker.reset_timeout_secs = MAX_RESET_TIMEOUT_SECS;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let mut config = ClientConfig::default();
        config.http.base_url = "not a url".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "http.base_url");
    }
}
