//! Resilient client for internal services.
//!
//! # Data Flow
//! ```text
//! get_user_data / get_template_data
//!     → service.rs (facade: admit → call → record outcome)
//!     → executor.rs (deadline, status mapping, request id)
//!     → transport.rs (reqwest GET)
//! ```
//!
//! # Design Decisions
//! - Transport and clock are traits so the facade can be driven deterministically
//! - Registry is injected, never reached through a global
//! - The breaker lock is never held across the network call

pub mod clock;
pub mod executor;
pub mod records;
pub mod service;
pub mod transport;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use records::{TemplateRecord, UserRecord};
pub use service::ServiceClient;
pub use transport::{HttpTransport, RawResponse, Transport};
