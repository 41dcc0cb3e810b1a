//! Error types for the image proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

// == Proxy Error Enum ==
/// Unified error type for the image proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Request carried no token
    #[error("Missing hash parameter.")]
    MissingToken,

    /// Token is not hex, has a bad block length, or failed to decrypt
    #[error("Invalid hash parameter.")]
    InvalidToken,

    /// Token decrypted, but the payload is not a card description
    #[error("Malformed hash parameter.")]
    MalformedPayload,

    /// Card description is missing required fields
    #[error("Invalid card: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// Requested width is not one of the allowed sizes
    #[error("Invalid size parameter.")]
    InvalidSize,

    /// Card type has no template
    #[error("Invalid card type.")]
    InvalidCardType,

    /// Upstream fetch failed (bad URL, network, non-200, body read)
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// Card rasterization failed
    #[error("Error creating image.")]
    RenderFailed(String),

    /// Unknown route
    #[error("Route not found.")]
    NotFound,
}

impl ProxyError {
    /// HTTP status used when this error surfaces on a strict route.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingToken
            | ProxyError::InvalidToken
            | ProxyError::MalformedPayload
            | ProxyError::Validation(_)
            | ProxyError::InvalidSize
            | ProxyError::InvalidCardType => StatusCode::BAD_REQUEST,
            ProxyError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            ProxyError::RenderFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ProxyError::Validation(fields) => json!({
                "status": status.as_u16(),
                "error": fields,
            }),
            ProxyError::RenderFailed(details) => json!({
                "status": status.as_u16(),
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({
                "status": status.as_u16(),
                "error": Value::String(self.to_string()),
            }),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the image proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
