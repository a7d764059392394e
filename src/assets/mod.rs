//! Static asset subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     explicit root | search candidates
//!     → discovery.rs (pick directory or proxy-only mode)
//!     → StaticFiles (canonical root, entry document)
//!
//! Request:
//!     path → files.rs resolve → File | EntryDocument | Forbidden | Unavailable
//!     → ServeFile
//! ```

pub mod discovery;
pub mod files;

pub use discovery::{default_candidates, discover_asset_root};
pub use files::{Resolution, StaticFiles};
