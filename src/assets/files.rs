//! Static file resolution with SPA fallback.
//!
//! # Responsibilities
//! - Map a request path onto the asset root
//! - Refuse paths that would leave the root (`..`, symlinks, drive prefixes)
//! - Substitute the entry document for missing files and directories
//! - Serve the chosen file through `tower_http::services::ServeFile`
//!
//! # Design Decisions
//! - Root is canonicalized once at startup; every served file must live under it
//! - Missing root means proxy-only mode, answered with 503 per request

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// Outcome of mapping a request path onto the asset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An existing file under the root.
    File(PathBuf),
    /// SPA fallback to the entry document.
    EntryDocument(PathBuf),
    /// Path attempts to escape the root.
    Forbidden,
    /// No asset root (proxy-only mode).
    Unavailable,
}

/// Read-only view of the asset directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: Option<PathBuf>,
    entry_document: String,
}

impl StaticFiles {
    pub fn new(root: Option<PathBuf>, entry_document: impl Into<String>) -> Self {
        let root = root.and_then(|r| match r.canonicalize() {
            Ok(canonical) => Some(canonical),
            Err(e) => {
                tracing::warn!(path = %r.display(), error = %e, "Cannot open asset directory");
                None
            }
        });

        Self {
            root,
            entry_document: entry_document.into(),
        }
    }

    /// Proxy-only instance.
    pub fn unavailable() -> Self {
        Self {
            root: None,
            entry_document: String::new(),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Map a (percent-encoded) request path onto the asset root.
    pub async fn resolve(&self, request_path: &str) -> Resolution {
        let Some(root) = &self.root else {
            return Resolution::Unavailable;
        };

        let decoded = match percent_decode_str(request_path).decode_utf8() {
            Ok(d) => d,
            Err(_) => return Resolution::Forbidden,
        };
        if decoded.contains('\0') || decoded.contains('\\') {
            return Resolution::Forbidden;
        }

        let mut candidate = root.clone();
        for segment in decoded.split('/') {
            if segment.is_empty() || segment == "." {
                continue;
            }
            let normal = Path::new(segment)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
            if !normal {
                return Resolution::Forbidden;
            }
            candidate.push(segment);
        }

        let is_file = tokio::fs::metadata(&candidate)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Resolution::EntryDocument(root.join(&self.entry_document));
        }

        match tokio::fs::canonicalize(&candidate).await {
            Ok(real) if real.starts_with(root) => Resolution::File(real),
            Ok(real) => {
                tracing::warn!(
                    path = %request_path,
                    resolved = %real.display(),
                    "Refusing to serve file outside the asset root"
                );
                Resolution::Forbidden
            }
            Err(_) => Resolution::EntryDocument(root.join(&self.entry_document)),
        }
    }

    /// Serve a static request, falling back to the entry document.
    pub async fn serve(&self, request: Request<Body>) -> Response {
        let path = request.uri().path().to_string();

        let file = match self.resolve(&path).await {
            Resolution::File(file) => file,
            Resolution::EntryDocument(entry) => {
                tracing::debug!(path = %path, "SPA fallback to entry document");
                entry
            }
            Resolution::Forbidden => {
                return (StatusCode::FORBIDDEN, "Forbidden").into_response();
            }
            Resolution::Unavailable => {
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Static file serving is not available: asset directory not found",
                )
                    .into_response();
            }
        };

        match ServeFile::new(file).oneshot(request).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }
}
