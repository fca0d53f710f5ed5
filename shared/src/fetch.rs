//! Outbound HTTP fetching for upstream APIs.
//!
//! Handlers only see the [`OutboundFetch`] trait so they can be exercised
//! against in-memory fakes. [`HttpFetcher`] is the `reqwest` implementation
//! used by the Lambda binaries.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use std::time::Duration;
use tracing::debug;

use crate::{Config, Error, Result};

/// Raw upstream reply: status code and undecoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Perform a fresh HTTP GET and hand back status and body.
///
/// Implementations must never serve a cached copy. Transport failures,
/// including timeouts, are reported as [`Error::Upstream`]; non-2xx replies
/// are not errors at this layer.
#[async_trait]
pub trait OutboundFetch: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchResponse>;
}

/// `reqwest`-backed fetcher with a bounded timeout and no response cache.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher honoring the configured upstream timeout.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_timeout(config.upstream_timeout)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let mut no_cache = HeaderMap::new();
        no_cache.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        no_cache.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .default_headers(no_cache)
            .connect_timeout(timeout.min(Duration::from_secs(3)))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl OutboundFetch for HttpFetcher {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(url, status, bytes = body.len(), "upstream responded");

        Ok(FetchResponse { status, body })
    }
}
