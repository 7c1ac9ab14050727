//! # Constants
//!
//! Shared defaults, overridable through environment variables where noted in
//! `config`.

/// Default HTTP server port for metrics, probes and discovery documents
pub const DEFAULT_METRICS_PORT: u16 = 5000;

/// Default HTTP server startup timeout (how long to wait for server to be ready)
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Default HTTP server readiness poll interval
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;

/// Default exponential backoff starting value for watch errors (milliseconds)
pub const DEFAULT_BACKOFF_START_MS: u64 = 1000;

/// Default exponential backoff maximum value for watch errors (milliseconds)
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 30_000;

/// Default delay before restarting watch stream after unknown errors (seconds)
pub const DEFAULT_WATCH_RESTART_DELAY_SECS: u64 = 5;

/// Default delay before restarting watch stream after it ends (seconds)
pub const DEFAULT_WATCH_RESTART_DELAY_AFTER_END_SECS: u64 = 1;

/// First retry delay after a failed publish or removal (seconds)
pub const DEFAULT_RETRY_BACKOFF_MIN_SECS: u64 = 1;

/// Cap on the retry delay after repeated failures (seconds)
pub const DEFAULT_RETRY_BACKOFF_MAX_SECS: u64 = 60;

/// Default tracing filter target
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Default log output format
pub const DEFAULT_LOG_FORMAT: &str = "json";
