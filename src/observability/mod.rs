//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (startup decisions, proxy dispatch, failures)
//!     → tower-http trace spans per request, tagged with x-request-id
//!
//! Consumer:
//!     → logging.rs subscriber (console)
//! ```

pub mod logging;
