//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! ProxyTarget
//!     → identity.rs (pick User-Agent)
//!     → fetcher.rs (single GET, timeout, relaxed TLS if configured)
//!     → UpstreamResponse | FetchError
//!     → http::relay
//! ```

pub mod fetcher;
pub mod identity;

pub use fetcher::{FetchError, UpstreamFetcher, UpstreamResponse};
pub use identity::{FixedUserAgent, RotatingUserAgents, UserAgentSource, USER_AGENTS};
