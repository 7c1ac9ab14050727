//! # Controller Configuration

use super::{flag_or, parse_or, string_or};
use crate::constants::{
    DEFAULT_BACKOFF_MAX_MS, DEFAULT_BACKOFF_START_MS, DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL,
    DEFAULT_RETRY_BACKOFF_MAX_SECS, DEFAULT_RETRY_BACKOFF_MIN_SECS,
    DEFAULT_WATCH_RESTART_DELAY_AFTER_END_SECS, DEFAULT_WATCH_RESTART_DELAY_SECS,
};
use std::time::Duration;

/// Controller-level configuration
///
/// All settings have defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Watch error backoff start (`BACKOFF_START_MS`)
    pub backoff_start_ms: u64,
    /// Watch error backoff cap (`BACKOFF_MAX_MS`)
    pub backoff_max_ms: u64,
    /// Delay before restarting the watch after an error (`WATCH_RESTART_DELAY_SECS`)
    pub watch_restart_delay_secs: u64,
    /// Delay before restarting the watch after the stream ended (`WATCH_RESTART_DELAY_AFTER_END_SECS`)
    pub watch_restart_delay_after_end_secs: u64,
    /// First retry delay for a failed cluster (`RETRY_BACKOFF_MIN_SECS`)
    pub retry_backoff_min_secs: u64,
    /// Maximum retry delay for a failed cluster (`RETRY_BACKOFF_MAX_SECS`)
    pub retry_backoff_max_secs: u64,
    /// Label selector restricting which PediaClusters are watched (`CLUSTER_LABEL_SELECTOR`)
    pub cluster_label_selector: Option<String>,
    /// Log level (`LOG_LEVEL`): ERROR, WARN, INFO, DEBUG, TRACE
    pub log_level: String,
    /// Log format (`LOG_FORMAT`): json or text
    pub log_format: String,
    /// ANSI colors in text logs (`LOG_ENABLE_COLOR`)
    pub log_enable_color: bool,
    /// Register Prometheus metrics (`ENABLE_METRICS`)
    pub enable_metrics: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            backoff_start_ms: parse_or(&lookup, "BACKOFF_START_MS", DEFAULT_BACKOFF_START_MS),
            backoff_max_ms: parse_or(&lookup, "BACKOFF_MAX_MS", DEFAULT_BACKOFF_MAX_MS),
            watch_restart_delay_secs: parse_or(
                &lookup,
                "WATCH_RESTART_DELAY_SECS",
                DEFAULT_WATCH_RESTART_DELAY_SECS,
            ),
            watch_restart_delay_after_end_secs: parse_or(
                &lookup,
                "WATCH_RESTART_DELAY_AFTER_END_SECS",
                DEFAULT_WATCH_RESTART_DELAY_AFTER_END_SECS,
            ),
            retry_backoff_min_secs: parse_or(
                &lookup,
                "RETRY_BACKOFF_MIN_SECS",
                DEFAULT_RETRY_BACKOFF_MIN_SECS,
            ),
            retry_backoff_max_secs: parse_or(
                &lookup,
                "RETRY_BACKOFF_MAX_SECS",
                DEFAULT_RETRY_BACKOFF_MAX_SECS,
            ),
            cluster_label_selector: lookup("CLUSTER_LABEL_SELECTOR")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            log_level: string_or(&lookup, "LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_format: string_or(&lookup, "LOG_FORMAT", DEFAULT_LOG_FORMAT),
            log_enable_color: flag_or(&lookup, "LOG_ENABLE_COLOR", false),
            enable_metrics: flag_or(&lookup, "ENABLE_METRICS", true),
        }
    }

    #[must_use]
    pub fn watch_restart_delay(&self) -> Duration {
        Duration::from_secs(self.watch_restart_delay_secs)
    }

    #[must_use]
    pub fn watch_restart_delay_after_end(&self) -> Duration {
        Duration::from_secs(self.watch_restart_delay_after_end_secs)
    }

    #[must_use]
    pub fn retry_backoff_min(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_min_secs)
    }

    #[must_use]
    pub fn retry_backoff_max(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_max_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.backoff_start_ms, 1000);
        assert_eq!(config.backoff_max_ms, 30_000);
        assert_eq!(config.retry_backoff_min(), Duration::from_secs(1));
        assert_eq!(config.retry_backoff_max(), Duration::from_secs(60));
        assert_eq!(config.cluster_label_selector, None);
        assert_eq!(config.log_format, "json");
        assert!(config.enable_metrics);
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = ControllerConfig::from_lookup(lookup_from(&[
            ("BACKOFF_START_MS", "250"),
            ("BACKOFF_MAX_MS", "not-a-number"),
            ("WATCH_RESTART_DELAY_SECS", " 9 "),
            ("CLUSTER_LABEL_SELECTOR", "fleet=prod"),
            ("LOG_FORMAT", "text"),
            ("ENABLE_METRICS", "off"),
            ("LOG_ENABLE_COLOR", "YES"),
        ]));

        assert_eq!(config.backoff_start_ms, 250);
        assert_eq!(config.backoff_max_ms, 30_000);
        assert_eq!(config.watch_restart_delay(), Duration::from_secs(9));
        assert_eq!(config.cluster_label_selector.as_deref(), Some("fleet=prod"));
        assert_eq!(config.log_format, "text");
        assert!(!config.enable_metrics);
        assert!(config.log_enable_color);
    }

    #[test]
    fn test_blank_label_selector_is_ignored() {
        let config = ControllerConfig::from_lookup(lookup_from(&[("CLUSTER_LABEL_SELECTOR", "  ")]));
        assert_eq!(config.cluster_label_selector, None);
    }
}
