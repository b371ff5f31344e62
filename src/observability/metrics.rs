//! Metrics collection and exposition.
//!
//! # Metrics
//! - `service_client_requests_total` (counter): calls by service and outcome
//! - `service_client_request_duration_seconds` (histogram): outbound latency
//! - `service_client_circuit_transitions_total` (counter): by service, from, to
//! - `service_client_circuit_state` (gauge): 0=closed, 1=open, 2=half-open
//! - `service_client_blocked_total` (counter): requests refused by an open circuit
//!
//! Without an installed recorder every call here is a no-op.

use ::metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::resilience::circuit_breaker::{CircuitState, Transition};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished outbound call.
pub fn record_request(service: &str, outcome: &'static str, start: Instant) {
    counter!(
        "service_client_requests_total",
        "service" => service.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "service_client_request_duration_seconds",
        "service" => service.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a breaker state change.
pub fn record_transition(service: &str, transition: Transition) {
    counter!(
        "service_client_circuit_transitions_total",
        "service" => service.to_string(),
        "from" => transition.from.as_str(),
        "to" => transition.to.as_str()
    )
    .increment(1);
    record_circuit_state(service, transition.to);
}

/// Publish the current state of a breaker.
pub fn record_circuit_state(service: &str, state: CircuitState) {
    gauge!("service_client_circuit_state", "service" => service.to_string()).set(state as u8 as f64);
}

/// Record a request refused without network I/O.
pub fn record_blocked(service: &str) {
    counter!("service_client_blocked_total", "service" => service.to_string()).increment(1);
}
