//! Response relay.
//!
//! # Responsibilities
//! - Turn an upstream response into the caller's response
//! - Strip hop-by-hop headers and recompute Content-Length
//! - Map fetch failures and rejected targets to plain-text errors
//!
//! # Design Decisions
//! - Bodies are relayed verbatim; nothing is re-encoded
//! - Upstream error statuses pass through with their body
//! - CORS headers are added by the server middleware, not here

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::routing::TargetError;
use crate::upstream::{FetchError, UpstreamResponse};

/// Headers never copied from the upstream response.
pub const HOP_BY_HOP: [HeaderName; 4] = [
    header::TRANSFER_ENCODING,
    header::CONTENT_ENCODING,
    header::CONTENT_LENGTH,
    header::CONNECTION,
];

/// Header names are stored lowercase, so this comparison is case-insensitive.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name)
}

/// Build the response for a fetch outcome.
pub fn relay(outcome: Result<UpstreamResponse, FetchError>) -> Response {
    match outcome {
        Ok(upstream) => relay_upstream(upstream),
        Err(FetchError::Status { status, body }) => with_body(status, body),
        Err(e @ (FetchError::Timeout { .. } | FetchError::Transport(_))) => {
            plain_text(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Build the response for a target that could not be dispatched.
pub fn reject(error: TargetError) -> Response {
    let status = match error {
        TargetError::Malformed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        TargetError::NotAllowed { .. } => StatusCode::FORBIDDEN,
    };
    plain_text(status, error.to_string())
}

fn relay_upstream(upstream: UpstreamResponse) -> Response {
    let mut response = with_body(upstream.status, upstream.body);
    let headers = response.headers_mut();

    for (name, value) in upstream.headers.iter() {
        if !is_hop_by_hop(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    response
}

fn with_body(status: StatusCode, body: Bytes) -> Response {
    let length = body.len();
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    response
}

fn plain_text(status: StatusCode, detail: String) -> Response {
    (status, detail).into_response()
}
