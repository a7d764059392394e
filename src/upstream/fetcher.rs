//! Outbound fetch with timeout and explicit TLS posture.
//!
//! # Responsibilities
//! - Issue exactly one GET per proxied request (no retries)
//! - Attach a rotated User-Agent
//! - Bound the whole exchange, body included, by a fixed timeout
//! - Return non-2xx upstream responses verbatim
//!
//! # Design Decisions
//! - TLS verification is controlled by `insecure_skip_verify`; when set,
//!   certificates and hostnames are NOT verified
//! - No idle connections are kept between requests
//! - Dropping the returned future abandons the outbound call

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;

use crate::config::UpstreamConfig;
use crate::routing::ProxyTarget;
use crate::upstream::identity::UserAgentSource;

/// A complete upstream response, body fully buffered.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Failures that prevented a complete upstream response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No complete response within the deadline.
    #[error("upstream request timed out after {secs} seconds")]
    Timeout { secs: u64 },

    /// Upstream answered with an error status but the body was cut short.
    #[error("upstream returned {status} and the body could not be read completely")]
    Status { status: StatusCode, body: Bytes },

    /// DNS, connect, TLS or protocol failure.
    #[error("upstream request failed: {0}")]
    Transport(String),
}

/// Performs outbound requests for the proxy.
#[derive(Debug, Clone)]
pub struct UpstreamFetcher {
    client: reqwest::Client,
    identity: Arc<dyn UserAgentSource>,
    timeout: Duration,
}

impl UpstreamFetcher {
    /// Build the fetcher and its HTTP client.
    pub fn new(config: &UpstreamConfig, identity: Arc<dyn UserAgentSource>) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .danger_accept_invalid_hostnames(config.insecure_skip_verify)
            .pool_max_idle_per_host(0);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        if config.insecure_skip_verify {
            tracing::warn!(
                "Upstream TLS certificate and hostname verification is DISABLED (insecure_skip_verify = true)"
            );
        }

        Ok(Self {
            client,
            identity,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Fetch `target` once.
    pub async fn fetch(&self, target: &ProxyTarget) -> Result<UpstreamResponse, FetchError> {
        let start = Instant::now();
        let secs = self.timeout.as_secs();

        let result = match timeout(self.timeout, self.exchange(target)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout { secs }),
        };

        match &result {
            Ok(response) => tracing::debug!(
                target_url = %target,
                status = %response.status,
                bytes = response.body.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream responded"
            ),
            Err(e) => tracing::warn!(
                target_url = %target,
                error = %e,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream fetch failed"
            ),
        }

        result
    }

    async fn exchange(&self, target: &ProxyTarget) -> Result<UpstreamResponse, FetchError> {
        let mut response = self
            .client
            .get(target.url().clone())
            .header(reqwest::header::USER_AGENT, self.identity.pick_user_agent())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let headers = std::mem::take(response.headers_mut());

        let mut body = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) if !status.is_success() && !e.is_timeout() => {
                    return Err(FetchError::Status {
                        status,
                        body: Bytes::from(body),
                    });
                }
                Err(e) => return Err(self.classify(e)),
            }
        }

        Ok(UpstreamResponse {
            status,
            headers,
            body: Bytes::from(body),
        })
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            FetchError::Transport(error_chain(&error))
        }
    }
}

/// Render an error with its sources, e.g. "error sending request: dns error: ...".
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
