//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build state → Bind listener → Announce URLs
//!
//! Shutdown (shutdown.rs):
//!     SIGINT/SIGTERM → broadcast → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Missing asset directory is not a startup error (proxy-only mode)

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
