//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check backend prefixes and origins
//! - Detect prefixes that can never match because an earlier one shadows them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PortalConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use url::Url;

use crate::config::schema::PortalConfig;

/// Namespace every backend prefix must live under.
pub const API_NAMESPACE: &str = "/api/";

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a fully merged configuration.
pub fn validate_config(config: &PortalConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a valid socket address", config.listener.bind_address),
        ));
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.timeout_secs",
            "must be greater than zero",
        ));
    }

    let entry = &config.assets.entry_document;
    if entry.is_empty() || entry.split(['/', '\\']).any(|part| part == "..") {
        errors.push(ValidationError::new(
            "assets.entry_document",
            format!("'{}' must be a relative path inside the asset root", entry),
        ));
    }

    if !config.generic_proxy.marker.starts_with('/') {
        errors.push(ValidationError::new(
            "generic_proxy.marker",
            "must start with '/'",
        ));
    }
    if config.generic_proxy.query_param.is_empty() {
        errors.push(ValidationError::new(
            "generic_proxy.query_param",
            "must not be empty",
        ));
    }

    for (i, backend) in config.backends.iter().enumerate() {
        let field = |name: &str| format!("backends[{}].{}", i, name);

        if !backend.prefix.starts_with(API_NAMESPACE) || backend.prefix.len() == API_NAMESPACE.len() {
            errors.push(ValidationError::new(
                field("prefix"),
                format!("'{}' must start with '{}' followed by a name", backend.prefix, API_NAMESPACE),
            ));
        } else if backend.prefix.ends_with('/') {
            errors.push(ValidationError::new(
                field("prefix"),
                format!("'{}' must not end with '/'", backend.prefix),
            ));
        }

        match Url::parse(&backend.origin) {
            Ok(url) if !matches!(url.scheme(), "http" | "https") => {
                errors.push(ValidationError::new(
                    field("origin"),
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
            Ok(url) if url.query().is_some() || url.fragment().is_some() => {
                errors.push(ValidationError::new(
                    field("origin"),
                    "must not carry a query or fragment",
                ));
            }
            Ok(_) => {}
            Err(e) => {
                errors.push(ValidationError::new(
                    field("origin"),
                    format!("'{}' is not an absolute URL: {}", backend.origin, e),
                ));
            }
        }

        // First match wins, so a later prefix under an earlier one is dead.
        if let Some(earlier) = config.backends[..i].iter().find(|earlier| {
            backend.prefix == earlier.prefix
                || backend
                    .prefix
                    .strip_prefix(earlier.prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        }) {
            errors.push(ValidationError::new(
                field("prefix"),
                format!("'{}' is shadowed by earlier prefix '{}'", backend.prefix, earlier.prefix),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
