//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of entries the product cache can hold
    pub cache_max_entries: usize,
    /// Product cache TTL in seconds
    pub cache_ttl: u64,
    /// Requests allowed per client per refill interval
    pub rate_limit_capacity: u64,
    /// Seconds over which a client's full capacity is restored
    pub rate_limit_refill_secs: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 500)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 600)
    /// - `RATE_LIMIT_CAPACITY` - Requests per client per interval (default: 20)
    /// - `RATE_LIMIT_REFILL_SECS` - Refill interval in seconds (default: 60)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 30)
    ///
    /// Missing, unparsable or zero values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            rate_limit_capacity: env_or("RATE_LIMIT_CAPACITY", defaults.rate_limit_capacity),
            rate_limit_refill_secs: env_or(
                "RATE_LIMIT_REFILL_SECS",
                defaults.rate_limit_refill_secs,
            ),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn rate_limit_refill_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_refill_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cache_max_entries: 500,
            cache_ttl: 600,
            rate_limit_capacity: 20,
            rate_limit_refill_secs: 60,
            cleanup_interval: 30,
        }
    }
}

fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + PartialEq + Default,
{
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .filter(|v: &T| *v != T::default())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cache_max_entries, 500);
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.rate_limit_capacity, 20);
        assert_eq!(config.rate_limit_refill_interval(), Duration::from_secs(60));
        assert_eq!(config.cleanup_interval, 30);
    }

    // Each test uses its own variable names: tests run in parallel threads
    #[test]
    fn test_env_or_parses_value() {
        env::set_var("PRODUCT_API_TEST_PARSE", " 42 ");
        assert_eq!(env_or("PRODUCT_API_TEST_PARSE", 7u64), 42);
    }

    #[test]
    fn test_env_or_rejects_zero_and_garbage() {
        env::set_var("PRODUCT_API_TEST_ZERO", "0");
        env::set_var("PRODUCT_API_TEST_GARBAGE", "lots");
        assert_eq!(env_or("PRODUCT_API_TEST_ZERO", 7u64), 7);
        assert_eq!(env_or("PRODUCT_API_TEST_GARBAGE", 7u64), 7);
        assert_eq!(env_or("PRODUCT_API_TEST_MISSING", 7u16), 7);
    }
}
