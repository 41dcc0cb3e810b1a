//! Overlay colour parsing.

const FALLBACK_OVERLAY: &str = "rgba(0,0,0,0.2)";

/// Parses `#RRGGBB` (either case).
fn parse_hex(input: &str) -> Option<(u8, u8, u8)> {
    let hex = input.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Parses `rgb(r, g, b)` with each channel in 0..=255.
fn parse_rgb(input: &str) -> Option<(u8, u8, u8)> {
    let inner = input.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').collect();
    if parts.len() != 3 {
        return None;
    }

    let channel = |s: &str| s.trim().parse::<u8>().ok();
    Some((channel(parts[0])?, channel(parts[1])?, channel(parts[2])?))
}

/// Converts an overlay colour to a translucent `rgba(...)` fill.
pub fn overlay_rgba(input: &str) -> String {
    let rgb = if input.starts_with('#') {
        parse_hex(input)
    } else {
        parse_rgb(input)
    };

    match rgb {
        Some((r, g, b)) => format!("rgba({},{},{},0.2)", r, g, b),
        None => FALLBACK_OVERLAY.to_string(),
    }
}
