//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, apply INTERNAL_API_BASE_URL)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → shared via Arc with the registry and facade
//! ```
//!
//! # Design Decisions
//! - Config is set once at startup; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::BreakerConfig;
pub use schema::ClientConfig;
pub use schema::HttpConfig;
pub use schema::ObservabilityConfig;
pub use schema::{TEMPLATE_SERVICE, USER_SERVICE};
