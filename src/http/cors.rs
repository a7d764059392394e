//! Permissive CORS headers.
//!
//! Every response leaving the server carries the same three headers, whatever
//! produced it. Upstream values for these names are overwritten.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, User-Agent";

/// Set the CORS headers, replacing any existing values.
pub fn apply(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// Response middleware applying [`apply`] to everything.
pub async fn cors_headers(mut response: Response) -> Response {
    apply(response.headers_mut());
    response
}

/// Answer to any OPTIONS request: 200 with an empty body.
pub fn preflight() -> Response {
    StatusCode::OK.into_response()
}
