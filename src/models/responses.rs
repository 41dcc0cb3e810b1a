//! Response DTOs for the image proxy API
//!
//! Defines the structure of outgoing JSON bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct InfoResponse {
    pub status: u16,
    pub data: String,
}

impl InfoResponse {
    pub fn running() -> Self {
        Self {
            status: 200,
            data: "Image service is running.".to_string(),
        }
    }
}

/// Payload of the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StatsData {
    /// Cache counters and sizes
    pub cache: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Bytes in use over the configured budget
    pub fill_ratio: f64,
    /// Human readable uptime, e.g. `2h 5m 3s`
    pub system_uptime: String,
    pub uptime_secs: i64,
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub status: u16,
    pub data: StatsData,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics and uptime
    pub fn new(cache: CacheStats, uptime: chrono::Duration) -> Self {
        let uptime_secs = uptime.num_seconds().max(0);
        Self {
            status: 200,
            data: StatsData {
                hit_rate: cache.hit_rate(),
                fill_ratio: cache.fill_ratio(),
                cache,
                system_uptime: format_uptime(uptime_secs),
                uptime_secs,
            },
        }
    }
}

fn format_uptime(secs: i64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}
