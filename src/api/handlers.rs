//! API Handlers
//!
//! HTTP request handlers for each image proxy endpoint.

use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::ImageCache;
use crate::card::{
    parse_width, Card, ExternalRasterizer, Renderer, SvgCardRenderer, CARD_CONTENT_TYPE,
};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::fetch::{FallbackImage, HttpFetcher};
use crate::models::{ImageQuery, InfoResponse, StatsResponse};
use crate::proxy::{CacheStatus, FetchCoordinator, ProxiedImage, TokenPayload};
use crate::token::TokenCodec;

/// Cache status header, `Hit` or `Miss`
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Why the fallback image was served instead of the requested one
pub const X_ERROR: HeaderName = HeaderName::from_static("x-error");

/// Browsers and CDNs may keep served images for a week
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=604800";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Token resolution and image cache
    pub proxy: Arc<FetchCoordinator>,
    /// Card generation
    pub renderer: Arc<dyn Renderer>,
    /// Process start, for uptime reporting
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Creates a new AppState from its collaborators.
    pub fn new(proxy: Arc<FetchCoordinator>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            proxy,
            renderer,
            started_at: Utc::now(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fetches the fallback image once; startup fails if it is unreachable.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout())?);
        let fallback = FallbackImage::load(fetcher.as_ref(), &config.fallback_image_url).await?;

        let proxy = Arc::new(FetchCoordinator::new(
            Arc::new(ImageCache::new(config.capacity_bytes())),
            TokenCodec::new(&config.secret_key),
            fetcher,
            fallback,
        ));
        let renderer = Arc::new(SvgCardRenderer::new(
            proxy.clone(),
            Arc::new(ExternalRasterizer::default()),
        ));

        Ok(Self::new(proxy, renderer))
    }
}

/// Writes image bytes with the proxy's caching headers.
fn image_response(image: ProxiedImage, error: Option<&ProxyError>) -> Response {
    let content_type = if image.content_type.is_empty() {
        None
    } else {
        HeaderValue::from_str(&image.content_type).ok()
    }
    .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

    let mut response = (StatusCode::OK, image.bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    headers.insert(X_CACHE, HeaderValue::from_static(image.cache_status.as_str()));

    if let Some(err) = error {
        if let Ok(value) = HeaderValue::from_str(err.to_string().trim_end_matches('.')) {
            headers.insert(X_ERROR, value);
        }
    }

    response
}

/// Handler for GET /image
///
/// Best-effort: always answers 200 with an image, substituting the fallback
/// for missing or invalid tokens and failed fetches.
pub async fn image_handler(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let query = ImageQuery::from_raw(raw.as_deref());
    match state.proxy.fetch_image(query.token()).await {
        Ok(image) => image_response(image, None),
        Err(err) => {
            debug!(error = %err, "Serving fallback for unresolvable token");
            image_response(state.proxy.fallback_image(), Some(&err))
        }
    }
}

/// Handler for GET /generate
///
/// Strict: every failure is reported as a JSON error.
pub async fn generate_handler(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Response> {
    let query = ImageQuery::from_raw(raw.as_deref());
    let token = query.token();

    let card = match state.proxy.resolve_payload(token).await? {
        TokenPayload::Cached(image) => return Ok(image_response(image, None)),
        TokenPayload::Plaintext(payload) => Card::from_payload(&payload)?,
    };
    card.validate()?;

    let width = parse_width(query.size.as_deref())?;
    let bytes = state.renderer.render(card, width).await?;

    state.proxy.store(token, bytes.clone(), CARD_CONTENT_TYPE).await;

    Ok(image_response(
        ProxiedImage {
            bytes,
            content_type: CARD_CONTENT_TYPE.to_string(),
            cache_status: CacheStatus::Miss,
            fallback: false,
        },
        None,
    ))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.proxy.cache().stats().await;
    Json(StatsResponse::new(stats, Utc::now() - state.started_at))
}

/// Handler for GET /
pub async fn info_handler() -> Json<InfoResponse> {
    Json(InfoResponse::running())
}

/// Fallback for unknown routes
pub async fn not_found_handler() -> ProxyError {
    ProxyError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchedImage, Fetcher};
    use async_trait::async_trait;
    use bytes::Bytes;

    struct DownFetcher;

    #[async_trait]
    impl Fetcher for DownFetcher {
        async fn get(&self, _url: &str) -> Result<FetchedImage> {
            Err(ProxyError::FetchFailed("offline".to_string()))
        }
    }

    struct NoRenderer;

    #[async_trait]
    impl Renderer for NoRenderer {
        async fn render(&self, _card: Card, _width: u32) -> Result<Bytes> {
            Err(ProxyError::RenderFailed("disabled".to_string()))
        }
    }

    fn state() -> AppState {
        let proxy = Arc::new(FetchCoordinator::new(
            Arc::new(ImageCache::new(1024)),
            TokenCodec::new("handler-tests"),
            Arc::new(DownFetcher),
            FallbackImage::new(&b"FALLBACK"[..], "image/png"),
        ));
        AppState::new(proxy, Arc::new(NoRenderer))
    }

    #[tokio::test]
    async fn test_image_handler_missing_token() {
        let response = image_handler(State(state()), RawQuery(None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(response.headers()[X_CACHE], "Miss");
        assert_eq!(response.headers()[X_ERROR], "Missing hash parameter");
    }

    #[tokio::test]
    async fn test_image_handler_invalid_token() {
        let query = Some("hash=nothex".to_string());
        let response = image_handler(State(state()), RawQuery(query)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[X_ERROR], "Invalid hash parameter");
        assert_eq!(response.headers()[header::CACHE_CONTROL], CACHE_CONTROL_VALUE);
    }

    #[tokio::test]
    async fn test_generate_handler_missing_token() {
        let result = generate_handler(State(state()), RawQuery(None)).await;
        assert!(matches!(result, Err(ProxyError::MissingToken)));
    }

    #[tokio::test]
    async fn test_image_handler_repeated_hash_uses_first() {
        let query = Some("hash=aa&token=bb&hash=cc".to_string());
        let response = image_handler(State(state()), RawQuery(query)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(response.headers()[X_ERROR], "Invalid hash parameter");
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(state())).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.data.cache.capacity_bytes, 1024);
        assert_eq!(response.data.cache.total_entries, 0);
    }

    #[tokio::test]
    async fn test_info_handler() {
        let response = info_handler().await;
        assert_eq!(response.data, "Image service is running.");
    }

    #[test]
    fn test_image_response_defaults_empty_content_type() {
        let response = image_response(
            ProxiedImage {
                bytes: Bytes::from_static(b"?"),
                content_type: String::new(),
                cache_status: CacheStatus::Hit,
                fallback: false,
            },
            None,
        );

        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");
        assert_eq!(response.headers()[X_CACHE], "Hit");
        assert!(response.headers().get(X_ERROR).is_none());
    }
}
