//! Shared HTTP plumbing for the completion and search collaborators.
//!
//! Provides:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff for transient failures
//! - Uniform mapping of non-success statuses onto [`ClientError`]

use std::time::Duration;

use reqwest::Client;
use reqwest::header::HeaderMap;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::api;
use crate::error::{ClientError, ClientResult};

/// Transport settings for one collaborator.
#[derive(Debug, Clone)]
pub(crate) struct HttpSettings {
    pub headers: HeaderMap,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_retries: u32,
}

/// Build a pooled client with retry middleware.
pub(crate) fn build_client(settings: HttpSettings) -> anyhow::Result<ClientWithMiddleware> {
    let client = Client::builder()
        .default_headers(settings.headers)
        .timeout(settings.timeout)
        .connect_timeout(settings.connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()?;

    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(500), Duration::from_secs(5))
        .build_with_max_retries(settings.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Map the transport error of a send, surfacing timeouts explicitly.
pub(crate) fn send_error(error: reqwest_middleware::Error, timeout: Duration) -> ClientError {
    match error {
        reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => ClientError::Timeout(timeout),
        reqwest_middleware::Error::Reqwest(e) => ClientError::Transport(e),
        other => ClientError::Middleware(other),
    }
}

/// Pass success through; turn anything else into a [`ClientError`].
pub(crate) async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok());
    let body = response.text().await.unwrap_or_default();

    Err(ClientError::from_status(status.as_u16(), retry_after, body))
}

/// Generate a cache key for a request.
pub(crate) fn cache_key(method: &str, url: &str, params: &[(&str, String)]) -> String {
    use md5::{Digest, Md5};

    let mut hasher = Md5::new();
    hasher.update(method.as_bytes());
    hasher.update(b"|");
    hasher.update(url.as_bytes());
    hasher.update(b"|");

    for (k, v) in params {
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
        hasher.update(b"&");
    }

    format!("{:x}", hasher.finalize())
}
