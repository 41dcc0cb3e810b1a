//! Cache Store Module
//!
//! Size-bounded image storage with least-recently-accessed eviction.

use std::collections::HashMap;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Token-keyed image storage bounded by total byte size.
///
/// Not synchronized; [`crate::cache::ImageCache`] wraps it in a lock.
///
/// After every completed mutation `total_size` equals the sum of entry sizes,
/// and after every `put` it is at most `capacity_bytes`, unless the item just
/// inserted is on its own larger than the whole budget. Such an item is
/// accepted as the sole entry and is the first to go on the next insert.
#[derive(Debug)]
pub struct CacheStore {
    /// Token to image storage
    entries: HashMap<String, CacheEntry>,
    /// Sum of `size_bytes` over `entries`
    total_size: usize,
    /// Size budget in bytes
    capacity_bytes: usize,
    /// Monotonic access counter
    tick: u64,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store holding at most `capacity_bytes` of images.
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            total_size: 0,
            capacity_bytes,
            tick: 0,
            stats: CacheStats::new(),
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    // == Get ==
    /// Looks up an image, refreshing its recency on a hit.
    pub fn get(&mut self, key: &str) -> Option<CacheEntry> {
        let tick = self.next_tick();

        let found = self.entries.get_mut(key).map(|entry| {
            entry.touch(tick);
            entry.clone()
        });
        self.stats.record_lookup(found.is_some());
        found
    }

    // == Put ==
    /// Stores an image under `key`, replacing any previous entry.
    ///
    /// Evicts least recently accessed entries until the new image fits or the
    /// store is empty.
    pub fn put(&mut self, key: String, image: Bytes, content_type: String) {
        let size = image.len();

        if let Some(previous) = self.entries.remove(&key) {
            self.total_size -= previous.size_bytes;
        }

        if self.total_size + size > self.capacity_bytes {
            self.evict_for(size);
        }

        if size > self.capacity_bytes {
            warn!(
                key = %key,
                size,
                capacity = self.capacity_bytes,
                "Caching image larger than the whole cache budget"
            );
        }

        let tick = self.next_tick();
        self.entries.insert(key, CacheEntry::new(image, content_type, tick));
        self.total_size += size;
    }

    // == Evict ==
    /// Removes oldest entries until `incoming` more bytes fit or nothing is left.
    ///
    /// Returns the number of entries removed.
    fn evict_for(&mut self, incoming: usize) -> usize {
        let mut evicted = 0;

        while self.total_size + incoming > self.capacity_bytes {
            let Some(oldest) = self.oldest_key() else {
                break;
            };

            if let Some(entry) = self.entries.remove(&oldest) {
                self.total_size -= entry.size_bytes;
                self.stats.record_eviction(entry.size_bytes);
                evicted += 1;
                debug!(
                    key = %oldest,
                    size = entry.size_bytes,
                    idle_ms = entry.idle_for().as_millis() as u64,
                    "Evicted cached image"
                );
            }
        }

        evicted
    }

    /// Key with the globally smallest recency; first encountered wins ties.
    fn oldest_key(&self) -> Option<String> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| entry.recency())
            .map(|(key, _)| key.clone())
    }

    // == Contains ==
    /// Checks for an entry without counting a lookup or refreshing recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.total_size_bytes = self.total_size;
        stats.capacity_bytes = self.capacity_bytes;
        stats
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of entry sizes computed from scratch; must equal `total_size`.
    #[cfg(test)]
    pub(crate) fn recomputed_size(&self) -> usize {
        self.entries.values().map(|e| e.size_bytes).sum()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn image(size: usize) -> Bytes {
        Bytes::from(vec![0xAB; size])
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(1024);
        assert!(store.is_empty());
        assert_eq!(store.total_size(), 0);
        assert_eq!(store.capacity_bytes(), 1024);
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = CacheStore::new(1024);

        store.put("tok".to_string(), Bytes::from_static(b"png-bytes"), "image/png".to_string());
        let entry = store.get("tok").unwrap();

        assert_eq!(entry.image, Bytes::from_static(b"png-bytes"));
        assert_eq!(entry.content_type, "image/png");
        assert_eq!(store.total_size(), 9);
    }

    #[test]
    fn test_store_get_missing() {
        let mut store = CacheStore::new(1024);
        assert!(store.get("nope").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite_replaces_size() {
        let mut store = CacheStore::new(1024);

        store.put("tok".to_string(), image(100), "image/png".to_string());
        store.put("tok".to_string(), image(40), "image/webp".to_string());

        assert_eq!(store.len(), 1);
        assert_eq!(store.total_size(), 40);
        assert_eq!(store.get("tok").unwrap().content_type, "image/webp");
    }

    #[test]
    fn test_store_overwrite_at_capacity_keeps_others() {
        let mut store = CacheStore::new(10);

        store.put("a".to_string(), image(5), "image/png".to_string());
        store.put("b".to_string(), image(5), "image/png".to_string());
        store.put("b".to_string(), image(5), "image/png".to_string());

        assert!(store.contains("a"));
        assert!(store.contains("b"));
        assert_eq!(store.total_size(), 10);
    }

    #[test]
    fn test_store_evicts_oldest_after_reads() {
        let mut store = CacheStore::new(10);

        store.put("a".to_string(), image(4), "image/png".to_string());
        store.get("a").unwrap();
        store.put("b".to_string(), image(4), "image/png".to_string());
        store.get("b").unwrap();
        store.put("c".to_string(), image(4), "image/png".to_string());
        store.get("c").unwrap();

        assert!(!store.contains("a"));
        assert!(store.contains("b"));
        assert!(store.contains("c"));
        assert_eq!(store.total_size(), 8);
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_read_refreshes_recency() {
        let mut store = CacheStore::new(10);

        store.put("a".to_string(), image(4), "image/png".to_string());
        store.put("b".to_string(), image(4), "image/png".to_string());
        store.get("a").unwrap();
        store.put("c".to_string(), image(4), "image/png".to_string());

        assert!(store.contains("a"));
        assert!(!store.contains("b"));
        assert!(store.contains("c"));
    }

    #[test]
    fn test_store_evicts_several_for_large_item() {
        let mut store = CacheStore::new(10);

        store.put("a".to_string(), image(3), "image/png".to_string());
        store.put("b".to_string(), image(3), "image/png".to_string());
        store.put("c".to_string(), image(3), "image/png".to_string());
        store.put("big".to_string(), image(9), "image/png".to_string());

        assert_eq!(store.len(), 1);
        assert!(store.contains("big"));
        assert_eq!(store.total_size(), 9);
        assert_eq!(store.stats().evictions, 3);
    }

    #[test]
    fn test_store_oversized_item_is_sole_entry() {
        let mut store = CacheStore::new(10);

        store.put("a".to_string(), image(4), "image/png".to_string());
        store.put("huge".to_string(), image(25), "image/png".to_string());

        assert_eq!(store.len(), 1);
        assert!(store.contains("huge"));
        assert_eq!(store.total_size(), 25);

        store.put("b".to_string(), image(2), "image/png".to_string());
        assert!(!store.contains("huge"));
        assert_eq!(store.total_size(), 2);
    }

    #[test]
    fn test_store_zero_capacity_still_terminates() {
        let mut store = CacheStore::new(0);

        store.put("a".to_string(), image(1), "image/png".to_string());
        store.put("b".to_string(), image(1), "image/png".to_string());

        assert_eq!(store.len(), 1);
        assert_eq!(store.recomputed_size(), store.total_size());
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(100);

        store.put("a".to_string(), image(10), "image/png".to_string());
        store.get("a");
        store.get("missing");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_size_bytes, 10);
        assert_eq!(stats.capacity_bytes, 100);
    }

    #[test]
    fn test_contains_does_not_count_lookup() {
        let mut store = CacheStore::new(100);
        store.put("a".to_string(), image(1), "image/png".to_string());

        assert!(store.contains("a"));
        assert_eq!(store.stats().hits, 0);
    }
}
