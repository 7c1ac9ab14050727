//! # Logging
//!
//! Installs the global tracing subscriber. `RUST_LOG` wins when set; otherwise
//! the configured `LOG_LEVEL` applies to this crate.

use crate::config::ControllerConfig;
use tracing_subscriber::EnvFilter;

/// Default filter directive for a level name such as `INFO`
#[must_use]
pub fn default_directive(log_level: &str) -> String {
    let level = match log_level.to_ascii_lowercase().as_str() {
        level @ ("error" | "warn" | "info" | "debug" | "trace") => level.to_string(),
        _ => "info".to_string(),
    };
    format!("cluster_resource_controller={level}")
}

/// Initialize the tracing subscriber (JSON or text per `LOG_FORMAT`).
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &ControllerConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.log_level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.log_format.eq_ignore_ascii_case("json") {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.with_ansi(config.log_enable_color).try_init()
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
