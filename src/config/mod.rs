//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs::validate_config (semantic checks)
//!     → PortalConfig (validated, immutable)
//!     → consumed by server construction at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; restarts pick up changes
//! - All fields have defaults to allow minimal configs
//! - Credentials are config-supplied only, never hard-coded

pub mod loader;
pub mod schema;

pub use loader::{load_config, validate_config, ConfigError};
pub use schema::{ListenerConfig, PortalConfig, TemplateConfig, TimeoutConfig, UpstreamConfig};
