//! Pixel Proxy - An image proxy addressed by opaque tokens
//!
//! Decrypts tokens into upstream image URLs, serves the images through a
//! size-bounded in-memory cache, and renders small generated cards.

pub mod api;
pub mod cache;
pub mod card;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod proxy;
pub mod token;

pub use api::AppState;
pub use config::Config;
pub use error::ProxyError;
pub use proxy::FetchCoordinator;
