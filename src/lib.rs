//! Resilient internal-service client library.
//!
//! Fetches user and template records from internal HTTP services, guarding each
//! service with its own circuit breaker.

pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod resilience;

pub use client::{ServiceClient, TemplateRecord, UserRecord};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, UnknownService};
pub use resilience::{CircuitRegistry, CircuitState};
