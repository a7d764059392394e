//! Route lookup and dispatch decision.
//!
//! # Responsibilities
//! - Classify a request path/query into exactly one [`RouteDecision`]
//! - Build the proxy target for proxied requests
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Decision order is fixed: generic proxy, backend prefix, static
//! - A generic proxy path without a target is a named decision that callers
//!   handle exactly like a static request
//! - Malformed targets become `Rejected`, never a panic

use axum::http::Uri;
use std::sync::Arc;

use crate::config::GenericProxyConfig;
use crate::routing::registry::BackendRegistry;
use crate::routing::target::{ProxyTarget, TargetError};

/// How a request will be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Proxy to the literal URL from the query parameter.
    GenericProxy { target: ProxyTarget },
    /// Proxy to a prefix-matched backend.
    Backend { name: String, target: ProxyTarget },
    /// Generic proxy path without a usable target; served as static.
    GenericProxyMissingTarget,
    /// Static asset or SPA fallback.
    Static,
    /// A proxy target was derived but cannot be used.
    Rejected(TargetError),
}

impl RouteDecision {
    /// Whether this decision is served by the static file layer.
    pub fn is_static(&self) -> bool {
        matches!(self, RouteDecision::Static | RouteDecision::GenericProxyMissingTarget)
    }
}

/// Compiled routing table.
#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<BackendRegistry>,
    generic: GenericProxyConfig,
}

impl Router {
    pub fn new(registry: Arc<BackendRegistry>, generic: GenericProxyConfig) -> Self {
        Self { registry, generic }
    }

    /// Decide how to handle a request URI.
    pub fn decide(&self, uri: &Uri) -> RouteDecision {
        let path = uri.path();
        let query = uri.query();

        let is_generic = path.contains(self.generic.marker.as_str());
        if is_generic {
            if let Some(raw) = query.and_then(|q| self.query_target(q)) {
                return self.generic_target(&raw);
            }
        }

        if let Some((entry, suffix)) = self.registry.lookup(path) {
            return match entry.target(suffix, query) {
                Ok(target) => RouteDecision::Backend {
                    name: entry.name().to_string(),
                    target,
                },
                Err(e) => RouteDecision::Rejected(e),
            };
        }

        if is_generic {
            RouteDecision::GenericProxyMissingTarget
        } else {
            RouteDecision::Static
        }
    }

    /// First non-empty value of the target query parameter.
    fn query_target(&self, query: &str) -> Option<String> {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, value)| *key == self.generic.query_param && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    }

    fn generic_target(&self, raw: &str) -> RouteDecision {
        let target = match ProxyTarget::parse(raw) {
            Ok(t) => t,
            Err(e) => return RouteDecision::Rejected(e),
        };

        if !self.generic.allow_any_origin && !self.registry.contains_origin(&target.origin()) {
            return RouteDecision::Rejected(TargetError::NotAllowed {
                origin: target.origin(),
            });
        }

        RouteDecision::GenericProxy { target }
    }
}
