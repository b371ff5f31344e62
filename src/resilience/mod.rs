//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a downstream service:
//!     → registry.rs (admit? per-service breaker, may move Open → Half-Open)
//!     → timeouts.rs (enforce the per-call deadline)
//!     → registry.rs (record success/failure, may open or close the circuit)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No per-call retries; the half-open trial is the only retry mechanism
//! - Circuit breaker prevents cascading failures
//! - circuit_breaker.rs is pure and clock-injected so it can be tested exhaustively

pub mod circuit_breaker;
pub mod registry;
pub mod timeouts;

pub use circuit_breaker::{Admission, BreakerPolicy, BreakerState, CircuitState, Transition};
pub use registry::{BreakerSnapshot, CircuitRegistry};
