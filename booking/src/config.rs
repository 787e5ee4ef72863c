//! Configuration management for the booking application.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application server configuration
    pub server: ServerConfig,
    /// Booking engine configuration
    pub engine: EngineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Booking engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on waiting for the state writer, in milliseconds.
    ///
    /// A dispatch that cannot take the writer within this window fails with
    /// a retryable error instead of hanging.
    pub dispatch_timeout_ms: u64,
    /// How many services the stats projection ranks by popularity
    pub stats_top_n: usize,
}

impl EngineConfig {
    /// The dispatch timeout as a [`Duration`]
    #[must_use]
    pub const fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_ms: 5_000,
            stats_top_n: 5,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env_or("SERVER_HOST", "127.0.0.1".to_string()),
                port: env_or("SERVER_PORT", 8080),
                log_level: env_or("LOG_LEVEL", "info".to_string()),
            },
            engine: EngineConfig {
                dispatch_timeout_ms: env_or("ENGINE_DISPATCH_TIMEOUT_MS", 5_000),
                stats_top_n: env_or("ENGINE_STATS_TOP_N", 5),
            },
        }
    }
}
