//! Fallback image served whenever a token cannot be resolved.

use bytes::Bytes;
use tracing::info;

use crate::error::Result;
use crate::fetch::Fetcher;

/// Immutable substitute image, loaded once at startup and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackImage {
    pub bytes: Bytes,
    pub content_type: String,
}

impl FallbackImage {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }

    /// Fetches the fallback image from `url`.
    pub async fn load(fetcher: &dyn Fetcher, url: &str) -> Result<Self> {
        let image = fetcher.get(url).await?;
        info!(
            size = image.bytes.len(),
            content_type = %image.content_type,
            "Fallback image loaded"
        );

        Ok(Self {
            bytes: image.bytes,
            content_type: image.content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProxyError;
    use crate::fetch::FetchedImage;
    use async_trait::async_trait;

    struct StaticFetcher(Option<FetchedImage>);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn get(&self, _url: &str) -> Result<FetchedImage> {
            self.0
                .clone()
                .ok_or_else(|| ProxyError::FetchFailed("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_load_uses_fetched_image() {
        let fetcher = StaticFetcher(Some(FetchedImage {
            bytes: Bytes::from_static(b"fallback"),
            content_type: "image/png".to_string(),
        }));

        let fallback = FallbackImage::load(&fetcher, "https://cdn.test/fallback.png")
            .await
            .unwrap();

        assert_eq!(fallback, FallbackImage::new(&b"fallback"[..], "image/png"));
    }

    #[test]
    fn test_load_propagates_fetch_failure() {
        let fetcher = StaticFetcher(None);
        let result = tokio_test::block_on(FallbackImage::load(
            &fetcher,
            "https://cdn.test/fallback.png",
        ));
        assert!(matches!(result, Err(ProxyError::FetchFailed(_))));
    }
}
