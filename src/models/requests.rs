//! Request DTOs for the image proxy API
//!
//! Defines the query parameters accepted by the image routes.

use url::form_urlencoded;

/// Query string for `GET /image` and `GET /generate`
///
/// # Fields
/// - `hash`: The opaque token (also accepted as `token`)
/// - `size`: Requested output width, only used by `/generate`
///
/// Parsed leniently from the raw query: repeated keys keep their first
/// value, `hash` wins over `token`, unknown keys are ignored. Parsing never
/// fails, so the image route can always answer with an image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageQuery {
    pub hash: Option<String>,
    pub size: Option<String>,
}

impl ImageQuery {
    pub fn from_raw(raw: Option<&str>) -> Self {
        let mut hash = None;
        let mut token = None;
        let mut size = None;

        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "hash" => &mut hash,
                "token" => &mut token,
                "size" => &mut size,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        Self {
            hash: hash.or(token),
            size,
        }
    }

    /// The token, or an empty string when absent.
    pub fn token(&self) -> &str {
        self.hash.as_deref().unwrap_or_default()
    }
}
