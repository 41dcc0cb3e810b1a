//! SVG templates for generated cards.

use std::fmt::Write;

use crate::card::color::overlay_rgba;
use crate::card::{Card, CardKind};

const CONTENT_MAX_CHARS: usize = 25;
const SUB_CONTENT_MAX_CHARS: usize = 45;
const PROGRESS_TRACK_WIDTH: f64 = 270.0;

/// Escapes text for use in SVG element content and attribute values.
pub fn escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

/// Cuts `text` to `max` characters, marking the cut with `..`.
pub fn slice_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("..");
    cut
}

/// Width of the filled part of the progress bar.
pub fn progress_width(percent: i64) -> i64 {
    (percent.clamp(0, 100) as f64 * PROGRESS_TRACK_WIDTH / 100.0).round() as i64
}

fn ratio_y(placement: &str) -> &'static str {
    if placement == "top" {
        "60"
    } else {
        "100"
    }
}

fn header(out: &mut String, background_href: &str) {
    let _ = write!(
        out,
        r#"<svg width="400" height="120" xmlns="http://www.w3.org/2000/svg"><defs><pattern id="background" patternUnits="userSpaceOnUse" width="400" height="120"><image href="{}" x="0" y="0" width="400" height="120" preserveAspectRatio="none"/></pattern></defs>"#,
        escape(background_href)
    );
}

fn backdrop(out: &mut String, card: &Card) {
    out.push_str(r#"<rect width="100%" height="100%" fill="url(#background)"/>"#);
    if card.add_overlay {
        let _ = write!(
            out,
            r#"<rect x="10" y="10" width="380" height="100" fill="{}" rx="10" ry="10"/>"#,
            overlay_rgba(&card.overlay_color)
        );
    }
    out.push_str(r#"<defs><clipPath id="avatarClip"><circle cx="60" cy="60" r="40"/></clipPath></defs>"#);
}

fn avatar(out: &mut String, avatar_href: &str) {
    let _ = write!(
        out,
        r#"<image href="{}" x="20" y="20" width="80" height="80" clip-path="url(#avatarClip)"/>"#,
        escape(avatar_href)
    );
}

/// Builds the SVG document for `card`.
///
/// `avatar_href` and `background_href` are embedded as-is (escaped); they are
/// expected to be data URIs or empty.
pub fn build(kind: CardKind, card: &Card, avatar_href: &str, background_href: &str) -> String {
    let mut out = String::new();
    let text_color = escape(&card.text_color);

    match kind {
        CardKind::Welcome => {
            header(&mut out, background_href);
            backdrop(&mut out, card);
            avatar(&mut out, avatar_href);

            let content_y = if card.sub_content.is_empty() { 60 } else { 55 };
            let _ = write!(
                out,
                r#"<text x="110" y="{}" alignment-baseline="middle" font-size="24" fill="{}" font-family="Arial, sans-serif">{}</text>"#,
                content_y,
                text_color,
                escape(&slice_text(&card.content, CONTENT_MAX_CHARS))
            );
            if !card.sub_content.is_empty() {
                let _ = write!(
                    out,
                    r#"<text x="110" y="80" alignment-baseline="middle" font-size="14" fill="{}" font-family="Arial, sans-serif" opacity="0.5">{}</text>"#,
                    text_color,
                    escape(&slice_text(&card.sub_content, SUB_CONTENT_MAX_CHARS))
                );
            }
        }
        CardKind::Rank => {
            let rank = card.rank_info.clone().unwrap_or_default();
            let progress = escape(&rank.progress_color);
            let empty = escape(&rank.empty_color);

            header(&mut out, background_href);
            let _ = write!(
                out,
                r#"<defs><linearGradient id="progressGradient" x1="0%" y1="0%" x2="100%" y2="0%"><stop offset="0%" style="stop-color: {p}; stop-opacity: 1"/><stop offset="90%" style="stop-color: {p}; stop-opacity: 1"/><stop offset="100%" style="stop-color: {e}; stop-opacity: 1"/></linearGradient></defs>"#,
                p = progress,
                e = empty
            );
            backdrop(&mut out, card);

            if !rank.type_content.is_empty() {
                let _ = write!(
                    out,
                    r#"<text x="380" y="25" font-size="10" fill="{}" opacity="0.7" font-family="Arial, sans-serif" text-anchor="end" dominant-baseline="hanging">{}</text>"#,
                    text_color,
                    escape(&rank.type_content)
                );
            }

            avatar(&mut out, avatar_href);
            let _ = write!(
                out,
                r#"<text x="110" y="55" alignment-baseline="middle" font-size="24" fill="{}" font-family="Arial, sans-serif" dominant-baseline="hanging">{}</text>"#,
                text_color,
                escape(&slice_text(&card.content, CONTENT_MAX_CHARS))
            );
            let _ = write!(
                out,
                r#"<rect x="110" y="70" width="270" height="15" rx="8" ry="8" fill="{}"/><rect x="110" y="70" width="{}" height="15" rx="8" ry="8" fill="url(#progressGradient)"/>"#,
                empty,
                progress_width(rank.ratio_percent.unwrap_or(0))
            );
            let _ = write!(
                out,
                r#"<text x="380" y="{}" font-size="10" fill="{}" opacity="0.7" font-family="Arial, sans-serif" text-anchor="end" dominant-baseline="hanging">{}</text>"#,
                ratio_y(&rank.ratio_placement),
                text_color,
                escape(&rank.ratio_string)
            );
        }
    }

    out.push_str("</svg>");
    out
}
