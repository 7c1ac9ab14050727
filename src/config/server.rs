//! # Server Configuration

use super::parse_or;
use crate::constants::{
    DEFAULT_METRICS_PORT, DEFAULT_SERVER_POLL_INTERVAL_MS, DEFAULT_SERVER_STARTUP_TIMEOUT_SECS,
};
use std::time::Duration;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen port (`METRICS_PORT`)
    pub metrics_port: u16,
    /// How long startup waits for the listener (`SERVER_STARTUP_TIMEOUT_SECS`)
    pub startup_timeout_secs: u64,
    /// Readiness poll interval during startup (`SERVER_POLL_INTERVAL_MS`)
    pub poll_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            metrics_port: parse_or(&lookup, "METRICS_PORT", DEFAULT_METRICS_PORT),
            startup_timeout_secs: parse_or(
                &lookup,
                "SERVER_STARTUP_TIMEOUT_SECS",
                DEFAULT_SERVER_STARTUP_TIMEOUT_SECS,
            ),
            poll_interval_ms: parse_or(
                &lookup,
                "SERVER_POLL_INTERVAL_MS",
                DEFAULT_SERVER_POLL_INTERVAL_MS,
            ),
        }
    }

    #[must_use]
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_out_of_range_falls_back_to_default() {
        let config = ServerConfig::from_lookup(|key| {
            (key == "METRICS_PORT").then(|| "70000".to_string())
        });
        assert_eq!(config.metrics_port, 5000);
    }

    #[test]
    fn test_durations() {
        let config = ServerConfig::default();
        assert_eq!(config.startup_timeout(), Duration::from_secs(10));
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
    }
}
