//! Fetch Coordinator
//!
//! Per-request pipeline: cache lookup, token decode, sanitization, upstream
//! fetch, fallback substitution and cache population.
//!
//! The cache lock is only taken inside [`ImageCache`] calls, never across the
//! upstream fetch. Concurrent misses for the same token are not coalesced;
//! each fetches and the last `put` wins.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, ImageCache};
use crate::error::{ProxyError, Result};
use crate::fetch::{FallbackImage, Fetcher};
use crate::token::{strip_control_chars, TokenCodec};

// == Cache Status ==
/// Whether a response was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Value for the `X-Cache` response header.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "Hit",
            CacheStatus::Miss => "Miss",
        }
    }
}

// == Proxied Image ==
/// Image bytes ready to be written to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxiedImage {
    pub bytes: Bytes,
    pub content_type: String,
    pub cache_status: CacheStatus,
    /// True when the fallback image was substituted
    pub fallback: bool,
}

impl ProxiedImage {
    fn hit(entry: CacheEntry) -> Self {
        Self {
            bytes: entry.image,
            content_type: entry.content_type,
            cache_status: CacheStatus::Hit,
            fallback: false,
        }
    }

    fn miss(bytes: Bytes, content_type: String) -> Self {
        Self {
            bytes,
            content_type,
            cache_status: CacheStatus::Miss,
            fallback: false,
        }
    }
}

/// Result of resolving a token whose plaintext is not a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPayload {
    /// Output for this token is already cached
    Cached(ProxiedImage),
    /// Sanitized plaintext, to be interpreted by the caller
    Plaintext(String),
}

// == Fetch Coordinator ==
/// Ties the token codec, image cache and upstream fetcher together.
pub struct FetchCoordinator {
    cache: Arc<ImageCache>,
    codec: TokenCodec,
    fetcher: Arc<dyn Fetcher>,
    fallback: FallbackImage,
}

impl FetchCoordinator {
    pub fn new(
        cache: Arc<ImageCache>,
        codec: TokenCodec,
        fetcher: Arc<dyn Fetcher>,
        fallback: FallbackImage,
    ) -> Self {
        Self {
            cache,
            codec,
            fetcher,
            fallback,
        }
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// The fallback image, tagged as a miss.
    pub fn fallback_image(&self) -> ProxiedImage {
        ProxiedImage {
            bytes: self.fallback.bytes.clone(),
            content_type: self.fallback.content_type.clone(),
            cache_status: CacheStatus::Miss,
            fallback: true,
        }
    }

    // == Fetch Image ==
    /// Resolves an image token.
    ///
    /// Fails only with [`ProxyError::MissingToken`] or
    /// [`ProxyError::InvalidToken`]. An upstream failure yields the fallback
    /// image, which is not cached, so the next request for the token retries.
    pub async fn fetch_image(&self, token: &str) -> Result<ProxiedImage> {
        if token.is_empty() {
            return Err(ProxyError::MissingToken);
        }

        if let Some(entry) = self.cache.get(token).await {
            debug!(token = %token, "Cache hit");
            return Ok(ProxiedImage::hit(entry));
        }

        let url = strip_control_chars(&self.codec.decode(token)?);

        match self.fetcher.get(&url).await {
            Ok(image) => {
                self.cache
                    .put(token, image.bytes.clone(), image.content_type.clone())
                    .await;
                Ok(ProxiedImage::miss(image.bytes, image.content_type))
            }
            Err(err) => {
                warn!(url = %url, error = %err, "Serving fallback image");
                Ok(self.fallback_image())
            }
        }
    }

    // == Fetch Direct ==
    /// Fetches a plain URL through the cache, keyed by the sanitized URL.
    ///
    /// Used for sub-images of generated cards. Failures are returned, not
    /// replaced by the fallback.
    pub async fn fetch_direct(&self, url: &str) -> Result<ProxiedImage> {
        let url = strip_control_chars(url);

        if let Some(entry) = self.cache.get(&url).await {
            return Ok(ProxiedImage::hit(entry));
        }

        let image = self.fetcher.get(&url).await?;
        self.cache
            .put(url, image.bytes.clone(), image.content_type.clone())
            .await;

        Ok(ProxiedImage::miss(image.bytes, image.content_type))
    }

    // == Resolve Payload ==
    /// Checks the cache for `token`, otherwise decodes and sanitizes it.
    pub async fn resolve_payload(&self, token: &str) -> Result<TokenPayload> {
        if token.is_empty() {
            return Err(ProxyError::MissingToken);
        }

        if let Some(entry) = self.cache.get(token).await {
            return Ok(TokenPayload::Cached(ProxiedImage::hit(entry)));
        }

        let plaintext = self.codec.decode(token)?;
        Ok(TokenPayload::Plaintext(strip_control_chars(&plaintext)))
    }

    /// Caches generated output under the token that described it.
    pub async fn store(&self, token: &str, bytes: Bytes, content_type: &str) {
        self.cache.put(token, bytes, content_type).await;
    }
}
