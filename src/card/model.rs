//! Card description carried inside `/generate` tokens.

use serde::Deserialize;

use crate::error::{ProxyError, Result};

/// Output widths the rasterizer may be asked for
pub const ALLOWED_WIDTHS: [u32; 5] = [256, 512, 1024, 2048, 4096];

/// Width used when the request gives none, or an unparsable one
pub const DEFAULT_WIDTH: u32 = 1024;

const DEFAULT_TEXT_COLOR: &str = "#ffffff";
const DEFAULT_OVERLAY_COLOR: &str = "#000000";
const DEFAULT_PROGRESS_COLOR: &str = "#e03131";
const DEFAULT_EMPTY_COLOR: &str = "#6741d9";

/// Card layouts with a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Welcome,
    Rank,
}

impl CardKind {
    pub fn parse(kind: &str) -> Result<Self> {
        match kind {
            "welcome" => Ok(CardKind::Welcome),
            "rank" => Ok(CardKind::Rank),
            _ => Err(ProxyError::InvalidCardType),
        }
    }
}

/// A card description as decoded from a token.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub sub_content: String,
    pub image_url: String,
    pub background_url: String,
    pub text_color: String,
    pub add_overlay: bool,
    pub overlay_color: String,
    pub rank_info: Option<RankInfo>,
}

/// Progress bar section of a `rank` card.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RankInfo {
    pub type_content: String,
    pub ratio_string: String,
    pub ratio_percent: Option<i64>,
    pub ratio_placement: String,
    pub progress_color: String,
    pub empty_color: String,
}

fn required(field: &str) -> String {
    format!("Field '{}' is required.", field)
}

impl Card {
    /// Parses a sanitized token payload.
    pub fn from_payload(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|_| ProxyError::MalformedPayload)
    }

    /// Reports every missing required field at once.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();

        if self.kind.is_empty() {
            missing.push(required("type"));
        }
        if self.content.is_empty() {
            missing.push(required("content"));
        }
        if self.image_url.is_empty() {
            missing.push(required("imageUrl"));
        }
        if self.background_url.is_empty() {
            missing.push(required("backgroundUrl"));
        }

        match &self.rank_info {
            Some(rank) => {
                if rank.ratio_string.is_empty() {
                    missing.push(required("ratioString"));
                }
                if rank.ratio_percent.is_none() {
                    missing.push(required("ratioPercent"));
                }
            }
            None if self.kind == "rank" => missing.push(required("rankInfo")),
            None => {}
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ProxyError::Validation(missing))
        }
    }

    /// Fills unset colours with their defaults.
    pub fn apply_defaults(&mut self) {
        if self.text_color.is_empty() {
            self.text_color = DEFAULT_TEXT_COLOR.to_string();
        }
        if self.overlay_color.is_empty() {
            self.overlay_color = DEFAULT_OVERLAY_COLOR.to_string();
        }
        if let Some(rank) = self.rank_info.as_mut() {
            if rank.progress_color.is_empty() {
                rank.progress_color = DEFAULT_PROGRESS_COLOR.to_string();
            }
            if rank.empty_color.is_empty() {
                rank.empty_color = DEFAULT_EMPTY_COLOR.to_string();
            }
        }
    }
}

/// Resolves the `size` query parameter to an allowed output width.
pub fn parse_width(size: Option<&str>) -> Result<u32> {
    let width = size
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(i64::from(DEFAULT_WIDTH));

    ALLOWED_WIDTHS
        .iter()
        .copied()
        .find(|allowed| i64::from(*allowed) == width)
        .ok_or(ProxyError::InvalidSize)
}
