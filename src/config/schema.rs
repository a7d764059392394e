//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits so any section can be overridden from a
//! TOML file; every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the portal server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Static asset directory and SPA entry document.
    pub assets: AssetConfig,

    /// Outbound fetch behaviour.
    pub upstream: UpstreamConfig,

    /// Query-parameter-driven proxy.
    pub generic_proxy: GenericProxyConfig,

    /// Prefix-based backends, matched in order.
    pub backends: Vec<BackendConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            assets: AssetConfig::default(),
            upstream: UpstreamConfig::default(),
            generic_proxy: GenericProxyConfig::default(),
            backends: default_backends(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8090").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8090".to_string(),
        }
    }
}

impl ListenerConfig {
    /// Replace the port of the bind address, keeping the host part.
    pub fn set_port(&mut self, port: u16) {
        let host = match self.bind_address.rsplit_once(':') {
            Some((host, _)) => host.to_string(),
            None => self.bind_address.clone(),
        };
        self.bind_address = format!("{}:{}", host, port);
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Explicit asset root. When unset the root is discovered at startup.
    pub root: Option<PathBuf>,

    /// Document served for unresolvable paths (SPA fallback).
    pub entry_document: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: None,
            entry_document: "index.html".to_string(),
        }
    }
}

/// Outbound request configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Total time allowed for one upstream exchange, in seconds.
    pub timeout_secs: u64,

    /// Skip certificate and hostname verification on outbound TLS.
    ///
    /// SECURITY: enabled by default so upstreams with certificate quirks
    /// still work from constrained networks. Any on-path attacker can read
    /// and alter proxied traffic while this is on.
    pub insecure_skip_verify: bool,

    /// Honour HTTP(S)_PROXY / NO_PROXY from the environment.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            insecure_skip_verify: true,
            system_proxy: true,
        }
    }
}

/// Generic proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenericProxyConfig {
    /// Path segment that marks a generic proxy request.
    pub marker: String,

    /// Query parameter carrying the absolute target URL.
    pub query_param: String,

    /// Accept any absolute URL as a target. When false, only origins of the
    /// configured backends are accepted.
    pub allow_any_origin: bool,
}

impl Default for GenericProxyConfig {
    fn default() -> Self {
        Self {
            marker: "/api/proxy".to_string(),
            query_param: "url".to_string(),
            allow_any_origin: true,
        }
    }
}

/// A prefix-based backend.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BackendConfig {
    /// Backend identifier for logging.
    pub name: String,

    /// Path prefix to match (e.g., "/api/reddit").
    pub prefix: String,

    /// Upstream origin the suffix is appended to (e.g., "https://www.reddit.com").
    pub origin: String,
}

impl BackendConfig {
    pub fn new(name: &str, prefix: &str, origin: &str) -> Self {
        Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            origin: origin.to_string(),
        }
    }
}

/// The built-in social network backends.
pub fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig::new("reddit", "/api/reddit", "https://www.reddit.com"),
        BackendConfig::new("mastodon", "/api/mastodon", "https://mastodon.social"),
        BackendConfig::new("nostr", "/api/nostr", "https://api.nostr.band"),
        BackendConfig::new("lemmy", "/api/lemmy", "https://lemmy.world"),
        BackendConfig::new("custom-feed", "/api/custom-feed", "https://piefed.social"),
        BackendConfig::new("misskey", "/api/misskey", "https://misskey.io"),
        BackendConfig::new("misskey-design", "/api/misskey-design", "https://misskey.design"),
        BackendConfig::new("bluesky", "/api/bluesky", "https://public.api.bsky.app"),
    ]
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PortalConfig::default();
        assert_eq!(config.backends.len(), 8);
        assert_eq!(config.upstream.timeout_secs, 15);
        assert!(config.upstream.insecure_skip_verify);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8090");
    }

    #[test]
    fn test_empty_toml_gets_builtin_backends() {
        let config: PortalConfig = toml::from_str("").unwrap();
        assert_eq!(config.backends.len(), 8);
        assert_eq!(config.backends[0].prefix, "/api/reddit");
        assert_eq!(config.generic_proxy.marker, "/api/proxy");
    }

    #[test]
    fn test_partial_toml_overrides_section() {
        let config: PortalConfig = toml::from_str(
            r#"
            [upstream]
            timeout_secs = 3

            [[backends]]
            name = "local"
            prefix = "/api/local"
            origin = "http://127.0.0.1:3000"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.timeout_secs, 3);
        assert!(config.upstream.insecure_skip_verify);
        assert_eq!(config.backends.len(), 1);
        assert_eq!(config.backends[0].name, "local");
    }

    #[test]
    fn test_set_port() {
        let mut listener = ListenerConfig::default();
        listener.set_port(9000);
        assert_eq!(listener.bind_address, "0.0.0.0:9000");
    }
}
