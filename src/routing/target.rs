//! Proxy targets.
//!
//! A [`ProxyTarget`] is the absolute URL an inbound request is translated
//! into. It can only be built through [`ProxyTarget::parse`], so anything
//! handed to the fetcher is a well-formed `http`/`https` URL.

use std::fmt;
use thiserror::Error;
use url::Url;

/// Reasons a request cannot be turned into a proxy target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    /// Target is not an absolute http(s) URL.
    #[error("malformed proxy target '{target}': {reason}")]
    Malformed { target: String, reason: String },

    /// Target origin is outside the allow-list.
    #[error("proxy target origin '{origin}' is not allowed")]
    NotAllowed { origin: String },
}

/// A validated absolute upstream URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget(Url);

impl ProxyTarget {
    /// Parse an absolute `http` or `https` URL.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let malformed = |reason: String| TargetError::Malformed {
            target: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw).map_err(|e| malformed(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(malformed(format!("unsupported scheme '{}'", other))),
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(malformed("missing host".to_string()));
        }

        Ok(Self(url))
    }

    /// The underlying URL.
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Serialized origin (`scheme://host[:port]`).
    pub fn origin(&self) -> String {
        self.0.origin().ascii_serialization()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProxyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
