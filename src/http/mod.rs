//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → OPTIONS? → cors.rs preflight
//!     → routing::Router decision
//!     → upstream::UpstreamFetcher → relay.rs
//!       or assets::StaticFiles
//!     → cors.rs headers on the way out
//!     → Send to client
//! ```

pub mod cors;
pub mod relay;
pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
