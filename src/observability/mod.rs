//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registry and facade produce:
//!     → logging.rs (structured log events: transitions, blocked requests)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through each outbound call span
//! - Metrics are cheap and no-ops when no recorder is installed

pub mod logging;
pub mod metrics;
