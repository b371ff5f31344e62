//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Service name of the downstream user service.
pub const USER_SERVICE: &str = "user_service";

/// Service name of the downstream template service.
pub const TEMPLATE_SERVICE: &str = "template_service";

/// Environment variable overriding `http.base_url`.
pub const BASE_URL_ENV: &str = "INTERNAL_API_BASE_URL";

/// Root configuration for the service client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Circuit breaker thresholds, shared by every registered service.
    pub breaker: BreakerConfig,

    /// Outbound HTTP settings.
    pub http: HttpConfig,

    /// Downstream services known to the registry.
    pub services: ServicesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Failures recorded before the circuit opens.
    pub max_failures: u32,

    /// Cooldown before an open circuit admits a trial call, in seconds.
    pub reset_timeout_secs: u64,
}

impl BreakerConfig {
    pub fn reset_timeout(&self) -> Duration {
        Duration::from_secs(self.reset_timeout_secs)
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            max_failures: 3,
            reset_timeout_secs: 60,
        }
    }
}

/// Outbound HTTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Base URL of the internal API (e.g., "http://localhost:8000/api/v1").
    pub base_url: String,

    /// Hard deadline for a single outbound call, in seconds.
    pub request_timeout_secs: u64,

    /// User-Agent header sent on every call.
    pub user_agent: String,
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            request_timeout_secs: 5,
            user_agent: concat!("service-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Registered downstream services.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Service names; one breaker is created per name at startup.
    pub names: Vec<String>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            names: vec![USER_SERVICE.to_string(), TEMPLATE_SERVICE.to_string()],
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty output for development, JSON for production.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
