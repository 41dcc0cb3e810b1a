//! API Module
//!
//! HTTP handlers and routing for the image proxy.
//!
//! # Endpoints
//! - `GET /` - Service info
//! - `GET /stats` - Cache statistics and uptime
//! - `GET /image?hash=` - Best-effort image by token
//! - `GET /generate?hash=&size=` - Generated card by token

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
