//! Fetch Module
//!
//! Upstream image retrieval and the process-wide fallback image.

mod fallback;
mod upstream;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

pub use fallback::FallbackImage;
pub use upstream::{validate_url, HttpFetcher};

/// An image as returned by an upstream server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Retrieves images from upstream.
///
/// Implementations fail with [`crate::error::ProxyError::FetchFailed`] for a
/// bad URL, a network error, a non-200 status or an unreadable body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchedImage>;
}
