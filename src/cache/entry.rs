//! Cache Entry Module
//!
//! Defines the structure for a single cached image.

use std::time::{Duration, Instant};

use bytes::Bytes;

// == Cache Entry ==
/// One cached image with its recency metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Raw image bytes as fetched
    pub image: Bytes,
    /// Content type reported upstream
    pub content_type: String,
    /// Size of `image` in bytes
    pub size_bytes: usize,
    /// Last time this entry was created or read
    pub last_accessed: Instant,
    /// Store-wide access counter at `last_accessed`, breaks same-instant ties
    access_tick: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry, stamped as accessed now.
    pub fn new(image: Bytes, content_type: String, tick: u64) -> Self {
        Self {
            size_bytes: image.len(),
            image,
            content_type,
            last_accessed: Instant::now(),
            access_tick: tick,
        }
    }

    // == Touch ==
    /// Marks the entry as accessed now.
    pub fn touch(&mut self, tick: u64) {
        self.last_accessed = Instant::now();
        self.access_tick = tick;
    }

    // == Recency ==
    /// Sort key for eviction; the smallest value is the least recently used.
    pub fn recency(&self) -> (Instant, u64) {
        (self.last_accessed, self.access_tick)
    }

    /// Time since the entry was last read or written.
    pub fn idle_for(&self) -> Duration {
        self.last_accessed.elapsed()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_records_size() {
        let entry = CacheEntry::new(Bytes::from_static(b"\x89PNG"), "image/png".to_string(), 0);

        assert_eq!(entry.size_bytes, 4);
        assert_eq!(entry.content_type, "image/png");
    }

    #[test]
    fn test_touch_advances_recency() {
        let mut entry = CacheEntry::new(Bytes::from_static(b"gif"), "image/gif".to_string(), 1);
        let before = entry.recency();

        sleep(Duration::from_millis(5));
        entry.touch(2);

        assert!(entry.recency() > before);
        assert!(entry.idle_for() < Duration::from_secs(1));
    }

    #[test]
    fn test_tick_breaks_ties() {
        let entry = CacheEntry::new(Bytes::new(), String::new(), 7);
        let mut later = entry.clone();
        later.access_tick = 8;

        assert!(entry.recency() < later.recency());
    }
}
