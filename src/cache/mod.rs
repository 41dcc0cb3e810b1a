//! Cache Module
//!
//! Provides in-memory image caching under a total byte budget with
//! least-recently-accessed eviction.

mod entry;
mod image_cache;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use image_cache::ImageCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Bytes per configured cache megabyte
pub const BYTES_PER_MB: usize = 1024 * 1024;
