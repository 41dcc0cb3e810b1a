//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::cache::BYTES_PER_MB;

/// Server configuration parameters.
#[derive(Clone)]
pub struct Config {
    /// Token cipher key material
    pub secret_key: String,
    /// Where the fallback image is fetched from at startup
    pub fallback_image_url: String,
    /// Cache budget in megabytes
    pub max_cache_size_mb: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Upstream fetch timeout in seconds
    pub fetch_timeout_secs: u64,
}

fn required(name: &str) -> anyhow::Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("missing {} in environment variables", name),
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SECRET_KEY` - Token cipher secret (required)
    /// - `FALLBACK_IMAGE_URL` - Fallback image source (required)
    /// - `MAX_CACHE_SIZE_MB` - Cache budget in MB (required)
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `FETCH_TIMEOUT_SECS` - Upstream fetch timeout (default: 5)
    pub fn from_env() -> anyhow::Result<Self> {
        let secret_key = required("SECRET_KEY")?;
        let fallback_image_url = required("FALLBACK_IMAGE_URL")?;
        let max_cache_size_mb = required("MAX_CACHE_SIZE_MB")?
            .parse()
            .context("MAX_CACHE_SIZE_MB must be a whole number of megabytes")?;

        let defaults = Self::default();

        Ok(Self {
            secret_key,
            fallback_image_url,
            max_cache_size_mb,
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.fetch_timeout_secs),
        })
    }

    /// Cache budget in bytes.
    pub fn capacity_bytes(&self) -> usize {
        self.max_cache_size_mb.saturating_mul(BYTES_PER_MB)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            fallback_image_url: String::new(),
            max_cache_size_mb: 64,
            server_port: 3000,
            fetch_timeout_secs: 5,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("secret_key", &"<redacted>")
            .field("fallback_image_url", &self.fallback_image_url)
            .field("max_cache_size_mb", &self.max_cache_size_mb)
            .field("server_port", &self.server_port)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .finish()
    }
}
