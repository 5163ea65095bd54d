//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → IntakeConfig (validated, immutable)
//!     → cloned into the subsystems that need it
//!
//! Secrets (service account key, sheet id)
//!     → environment / .env, read by lifecycle::startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    FormConfig, IntakeConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig,
    SecurityConfig, SinkConfig, SinkKind, TimeoutConfig,
};
pub use validation::{validate_config, ConfigViolation};
