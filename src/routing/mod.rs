//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → router.rs (decision order: generic proxy, backend, static)
//!     → registry.rs (prefix lookup on segment boundaries)
//!     → target.rs (validate absolute upstream URL)
//!     → Return: RouteDecision
//!
//! Registry Compilation (at startup):
//!     BackendConfig[]
//!     → Parse origins
//!     → Freeze as immutable, ordered BackendRegistry
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same decision
//! - First match wins (configuration order)

pub mod registry;
pub mod router;
pub mod target;

pub use registry::{BackendEntry, BackendRegistry};
pub use router::{RouteDecision, Router};
pub use target::{ProxyTarget, TargetError};
