//! Server configuration module
//!
//! Handles loading configuration from environment variables with sensible defaults.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Static assets shipped with the crate, independent of the working directory.
const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public");

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port (default: 4000)
    pub port: u16,
    /// Server host (default: 127.0.0.1)
    pub host: Ipv4Addr,
    /// Path of the JSON image blob (default: images.json)
    pub data_file: PathBuf,
    /// Directory served under /public (default: this crate's public/)
    pub static_dir: PathBuf,
    /// Timeout for one dominant color extraction in seconds (default: 10)
    pub extract_timeout_secs: u64,
    /// Largest image download in MB (default: 20)
    pub max_image_mb: usize,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Request body limit in KB (default: 64)
    pub body_limit_kb: usize,
    /// Enable rate limiting (default: false for tests, true when loaded from env)
    pub rate_limit_enabled: bool,
    /// Rate limit: requests per second (default: 10)
    pub rate_limit_per_sec: u64,
    /// Rate limit: burst size (default: 20)
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 4000,
            host: Ipv4Addr::LOCALHOST,
            data_file: PathBuf::from("images.json"),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            extract_timeout_secs: 10,
            max_image_mb: 20,
            timeout_secs: 30,
            body_limit_kb: 64,
            rate_limit_enabled: false, // Disabled by default (for tests)
            rate_limit_per_sec: 10,
            rate_limit_burst: 20,
        }
    }
}

/// Reads `name` and parses it, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let data_file = std::env::var("DATA_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        // Rate limiting enabled by default in production, can be disabled with RATE_LIMIT_ENABLED=false
        let rate_limit_enabled = std::env::var("RATE_LIMIT_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Self {
            port: env_or("PORT", defaults.port),
            host: env_or("HOST", defaults.host),
            data_file,
            static_dir,
            extract_timeout_secs: env_or("EXTRACT_TIMEOUT_SECS", defaults.extract_timeout_secs),
            max_image_mb: env_or("MAX_IMAGE_MB", defaults.max_image_mb),
            timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.timeout_secs),
            body_limit_kb: env_or("BODY_LIMIT_KB", defaults.body_limit_kb),
            rate_limit_enabled,
            rate_limit_per_sec: env_or("RATE_LIMIT_PER_SEC", defaults.rate_limit_per_sec),
            rate_limit_burst: env_or("RATE_LIMIT_BURST", defaults.rate_limit_burst),
        }
    }

    /// Get socket address from config
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }

    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }
}
