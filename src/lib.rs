//! Portable SPA server with a CORS-friendly social API proxy.

pub mod assets;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::PortalConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
