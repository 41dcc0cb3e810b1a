//! Proxy Module
//!
//! Request-level orchestration of token resolution, caching and fetching.

mod coordinator;

pub use coordinator::{CacheStatus, FetchCoordinator, ProxiedImage, TokenPayload};
