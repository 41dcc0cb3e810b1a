//! Shared Image Cache
//!
//! Thread-safe handle over [`CacheStore`]. Every operation holds the lock for
//! one in-memory critical section only; callers never hold it across I/O.

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::cache::{CacheEntry, CacheStats, CacheStore};

// == Image Cache ==
/// Concurrent token-to-image cache with a total size budget.
#[derive(Debug)]
pub struct ImageCache {
    store: Mutex<CacheStore>,
}

impl ImageCache {
    /// Creates an empty cache holding at most `capacity_bytes` of images.
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            store: Mutex::new(CacheStore::new(capacity_bytes)),
        }
    }

    /// Looks up an image; a hit refreshes its recency.
    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        self.store.lock().await.get(key)
    }

    /// Stores an image, evicting older entries as needed.
    pub async fn put(&self, key: impl Into<String>, image: Bytes, content_type: impl Into<String>) {
        self.store
            .lock()
            .await
            .put(key.into(), image, content_type.into());
    }

    /// Checks for an entry without touching it.
    pub async fn contains(&self, key: &str) -> bool {
        self.store.lock().await.contains(key)
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }
}
