//! Cache Statistics Module
//!
//! Counters reported by the stats endpoint.

use serde::Serialize;

// == Cache Stats ==
/// Lookup and eviction counters plus a snapshot of the store's size.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped to make room for newer images
    pub evictions: u64,
    /// Bytes released by those evictions
    pub evicted_bytes: u64,
    pub total_entries: usize,
    /// Sum of all cached image sizes
    pub total_size_bytes: usize,
    /// Configured size budget
    pub capacity_bytes: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// hits / (hits + misses), or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    /// Share of the byte budget in use. Can exceed 1.0 while a single
    /// oversized image is held.
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity_bytes == 0 {
            return 0.0;
        }
        self.total_size_bytes as f64 / self.capacity_bytes as f64
    }

    pub fn record_lookup(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn record_eviction(&mut self, size_bytes: usize) {
        self.evictions += 1;
        self.evicted_bytes += size_bytes as u64;
    }
}
