//! HTTP Fetcher
//!
//! reqwest-backed [`Fetcher`] with a bounded per-request timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ProxyError, Result};
use crate::fetch::{FetchedImage, Fetcher};

// == URL Validation ==
/// Parses `raw` (after trimming surrounding whitespace) and requires an
/// `http` or `https` scheme.
pub fn validate_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ProxyError::FetchFailed(format!("invalid URL {:?}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ProxyError::FetchFailed(format!(
            "unsupported URL scheme {:?}",
            other
        ))),
    }
}

// == HTTP Fetcher ==
/// Fetches images over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::FetchFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchedImage> {
        let url = validate_url(url)?;

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Upstream request failed");
            ProxyError::FetchFailed(e.to_string())
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(url = %url, status = %status, "Upstream returned non-200 status");
            return Err(ProxyError::FetchFailed(format!("upstream status {}", status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response.bytes().await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to read upstream body");
            ProxyError::FetchFailed(e.to_string())
        })?;

        debug!(url = %url, size = bytes.len(), content_type = %content_type, "Fetched upstream image");

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}
