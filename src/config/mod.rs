//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file on top)
//!     → CLI / environment overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → PortalConfig (validated, immutable)
//!     → shared by value/Arc with all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so no file is needed
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    AssetConfig, BackendConfig, GenericProxyConfig, ListenerConfig, ObservabilityConfig,
    PortalConfig, UpstreamConfig,
};
