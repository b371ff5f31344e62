//! Error taxonomy for downstream service calls.

use std::time::Duration;
use thiserror::Error;

/// Lookup of a service name that was never registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown service: {0}")]
pub struct UnknownService(pub String);

/// Errors that can occur while fetching a record from a downstream service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Service name was never registered (programmer error).
    #[error(transparent)]
    UnknownService(#[from] UnknownService),

    /// Circuit is open; no request was attempted.
    #[error("Circuit open for {service}: request blocked")]
    CircuitOpen { service: String },

    /// Connection refused, DNS failure, or any other transport fault.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The call did not complete within its deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Downstream answered with a non-2xx status.
    #[error("Upstream returned status {status}")]
    Upstream { status: u16 },

    /// A 2xx body that could not be decoded into the expected record.
    #[error("Malformed response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// Whether this outcome is recorded as a failure on the service's breaker.
    ///
    /// A malformed body counts: the caller got nothing usable.
    pub fn counts_as_failure(&self) -> bool {
        match self {
            ClientError::Transport(_)
            | ClientError::Timeout(_)
            | ClientError::Upstream { .. }
            | ClientError::Decode(_) => true,
            ClientError::CircuitOpen { .. } | ClientError::UnknownService(_) => false,
        }
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::UnknownService(_) => "unknown_service",
            ClientError::CircuitOpen { .. } => "blocked",
            ClientError::Transport(_) => "transport",
            ClientError::Timeout(_) => "timeout",
            ClientError::Upstream { .. } => "upstream",
            ClientError::Decode(_) => "decode",
        }
    }

    /// True when the downstream said the record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Upstream { status: 404 })
    }
}

/// Result type for service client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_classification() {
        assert!(ClientError::Transport("refused".into()).counts_as_failure());
        assert!(ClientError::Timeout(Duration::from_secs(5)).counts_as_failure());
        assert!(ClientError::Upstream { status: 503 }.counts_as_failure());
        assert!(ClientError::Upstream { status: 404 }.counts_as_failure());
        assert!(ClientError::Decode("eof".into()).counts_as_failure());

        assert!(!ClientError::CircuitOpen { service: "user_service".into() }.counts_as_failure());
        assert!(!ClientError::from(UnknownService("billing".into())).counts_as_failure());
    }

    #[test]
    fn test_display() {
        let err = ClientError::from(UnknownService("billing".into()));
        assert_eq!(err.to_string(), "Unknown service: billing");
        assert!(ClientError::Upstream { status: 404 }.is_not_found());
        assert_eq!(
            ClientError::CircuitOpen { service: "user_service".into() }.to_string(),
            "Circuit open for user_service: request blocked"
        );
    }
}
