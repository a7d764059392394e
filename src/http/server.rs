//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with the single dispatch handler
//! - Wire up middleware (request ID, tracing, CORS headers)
//! - Answer CORS preflight before any routing
//! - Dispatch to the upstream fetcher or the static file layer
//! - Graceful shutdown

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::assets::{default_candidates, discover_asset_root, StaticFiles};
use crate::config::PortalConfig;
use crate::http::cors;
use crate::http::relay;
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::routing::{BackendRegistry, RouteDecision, Router as ProxyRouter, TargetError};
use crate::upstream::{RotatingUserAgents, UpstreamFetcher, UserAgentSource};

/// Errors building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid backend origin: {0}")]
    Registry(#[from] TargetError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub fetcher: Arc<UpstreamFetcher>,
    pub assets: Arc<StaticFiles>,
}

impl AppState {
    /// Build every subsystem from configuration.
    pub fn from_config(
        config: &PortalConfig,
        identity: Arc<dyn UserAgentSource>,
    ) -> Result<Self, ServerError> {
        let registry = Arc::new(BackendRegistry::from_config(&config.backends)?);
        let router = ProxyRouter::new(registry, config.generic_proxy.clone());
        let fetcher = UpstreamFetcher::new(&config.upstream, identity)?;

        let root = discover_asset_root(config.assets.root.as_deref(), &default_candidates());
        let assets = match root {
            Some(root) => StaticFiles::new(Some(root), config.assets.entry_document.clone()),
            None => StaticFiles::unavailable(),
        };

        Ok(Self {
            router: Arc::new(router),
            fetcher: Arc::new(fetcher),
            assets: Arc::new(assets),
        })
    }
}

/// HTTP server for the portal.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server with the rotating browser identity.
    pub fn new(config: &PortalConfig) -> Result<Self, ServerError> {
        Self::with_identity(config, Arc::new(RotatingUserAgents))
    }

    /// Create a server with a specific User-Agent source.
    pub fn with_identity(
        config: &PortalConfig,
        identity: Arc<dyn UserAgentSource>,
    ) -> Result<Self, ServerError> {
        let state = AppState::from_config(config, identity)?;

        tracing::info!(
            backends = config.backends.len(),
            generic_proxy = %config.generic_proxy.marker,
            allow_any_origin = config.generic_proxy.allow_any_origin,
            static_root = ?state.assets.root(),
            "Routing table compiled"
        );

        let router = Self::build_router(state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(map_response(cors::cors_headers))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server until the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Single entry point for every request.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method().clone();

    if method == Method::OPTIONS {
        return cors::preflight();
    }
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD, OPTIONS")],
            "Method Not Allowed",
        )
            .into_response();
    }

    let uri = request.uri().clone();
    let request_id = request_id(&request).to_string();

    match state.router.decide(&uri) {
        RouteDecision::GenericProxy { target } => {
            tracing::info!(request_id = %request_id, target_url = %target, "Direct proxying");
            relay::relay(state.fetcher.fetch(&target).await)
        }
        RouteDecision::Backend { name, target } => {
            tracing::info!(
                request_id = %request_id,
                backend = %name,
                uri = %uri,
                target_url = %target,
                "Proxying"
            );
            relay::relay(state.fetcher.fetch(&target).await)
        }
        RouteDecision::Rejected(error) => {
            tracing::warn!(request_id = %request_id, uri = %uri, error = %error, "Proxy target rejected");
            relay::reject(error)
        }
        RouteDecision::GenericProxyMissingTarget => {
            tracing::debug!(
                request_id = %request_id,
                uri = %uri,
                "Generic proxy path without target, serving as static"
            );
            state.assets.serve(request).await
        }
        RouteDecision::Static => state.assets.serve(request).await,
    }
}
