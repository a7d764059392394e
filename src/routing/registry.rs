//! Backend registry.
//!
//! # Responsibilities
//! - Hold the ordered (prefix, origin) pairs
//! - Find the first entry whose prefix matches a request path
//! - Build the upstream target for a matched path
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Prefixes match on a path-segment boundary, so `/api/misskey` never
//!   captures `/api/misskey-design/...`
//! - O(n) scan; the table holds a handful of entries

use url::Url;

use crate::config::BackendConfig;
use crate::routing::target::{ProxyTarget, TargetError};

/// A configured (prefix, origin) pair.
#[derive(Debug, Clone)]
pub struct BackendEntry {
    name: String,
    prefix: String,
    /// Origin with any trailing slash removed, ready for concatenation.
    base: String,
    origin: String,
}

impl BackendEntry {
    pub fn new(name: &str, prefix: &str, origin: &str) -> Result<Self, TargetError> {
        let url = Url::parse(origin).map_err(|e| TargetError::Malformed {
            target: origin.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            base: origin.trim_end_matches('/').to_string(),
            origin: url.origin().ascii_serialization(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the remainder of `path` after this prefix, if it matches.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Build the upstream target: origin + suffix, with the query preserved.
    ///
    /// The result is a WHATWG URL, so dot segments (including `%2e%2e`) are
    /// resolved and characters outside the URL query set, such as `'`, are
    /// percent-encoded. Everything else passes through byte for byte.
    pub fn target(&self, suffix: &str, query: Option<&str>) -> Result<ProxyTarget, TargetError> {
        let raw = match query {
            Some(q) => format!("{}{}?{}", self.base, suffix, q),
            None => format!("{}{}", self.base, suffix),
        };
        ProxyTarget::parse(&raw)
    }
}

/// Ordered, immutable list of backends. First match wins.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    entries: Vec<BackendEntry>,
}

impl BackendRegistry {
    pub fn from_config(backends: &[BackendConfig]) -> Result<Self, TargetError> {
        let entries = backends
            .iter()
            .map(|b| BackendEntry::new(&b.name, &b.prefix, &b.origin))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// Find the first entry matching `path`, with the unmatched suffix.
    pub fn lookup<'a>(&self, path: &'a str) -> Option<(&BackendEntry, &'a str)> {
        self.entries
            .iter()
            .find_map(|entry| entry.strip(path).map(|suffix| (entry, suffix)))
    }

    /// Whether `origin` belongs to any configured backend.
    pub fn contains_origin(&self, origin: &str) -> bool {
        self.entries.iter().any(|e| e.origin == origin)
    }
}
