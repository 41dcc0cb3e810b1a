//! Card Module
//!
//! Generates small status cards (welcome, rank) from a JSON description:
//! sub-images are pulled through the image cache, the card is laid out as
//! SVG, then rasterized to WebP.

mod color;
mod model;
mod raster;
mod svg;

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use tracing::warn;

use crate::error::Result;
use crate::proxy::FetchCoordinator;

pub use model::{parse_width, Card, CardKind, RankInfo, ALLOWED_WIDTHS, DEFAULT_WIDTH};
pub use raster::{ExternalRasterizer, Rasterizer};

/// Content type of rendered cards
pub const CARD_CONTENT_TYPE: &str = "image/webp";

/// Produces encoded card images.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders a validated card at one of [`ALLOWED_WIDTHS`].
    async fn render(&self, card: Card, width: u32) -> Result<Bytes>;
}

/// Renders cards as SVG and hands them to a [`Rasterizer`].
pub struct SvgCardRenderer {
    images: Arc<FetchCoordinator>,
    rasterizer: Arc<dyn Rasterizer>,
}

impl SvgCardRenderer {
    pub fn new(images: Arc<FetchCoordinator>, rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self { images, rasterizer }
    }

    /// Fetches `url` as a data URI; empty on failure so the card still renders.
    async fn embed(&self, url: &str) -> String {
        match self.images.fetch_direct(url).await {
            Ok(image) => format!(
                "data:{};base64,{}",
                image.content_type,
                STANDARD.encode(&image.bytes)
            ),
            Err(err) => {
                warn!(url = %url, error = %err, "Card sub-image unavailable");
                String::new()
            }
        }
    }

    /// Builds the SVG for `card` without rasterizing it.
    pub async fn layout(&self, mut card: Card) -> Result<String> {
        let kind = CardKind::parse(&card.kind)?;
        card.apply_defaults();

        let background = self.embed(&card.background_url).await;
        let avatar = self.embed(&card.image_url).await;

        Ok(svg::build(kind, &card, &avatar, &background))
    }
}

#[async_trait]
impl Renderer for SvgCardRenderer {
    async fn render(&self, card: Card, width: u32) -> Result<Bytes> {
        let svg = self.layout(card).await?;
        self.rasterizer.rasterize(&svg, width).await
    }
}
