//! # Configuration
//!
//! Controller and server settings loaded from environment variables
//! (populated from a ConfigMap through `envFrom` in the deployment).
//!
//! - `controller.rs` - watch, retry and logging settings
//! - `server.rs` - HTTP server settings

mod controller;
mod server;

pub use controller::ControllerConfig;
pub use server::ServerConfig;

use std::sync::Arc;
use tokio::sync::RwLock;

pub type SharedControllerConfig = Arc<RwLock<ControllerConfig>>;
pub type SharedServerConfig = Arc<RwLock<ServerConfig>>;

/// Load both configurations from the process environment
#[must_use]
pub fn create_shared_config() -> (SharedControllerConfig, SharedServerConfig) {
    (
        Arc::new(RwLock::new(ControllerConfig::from_env())),
        Arc::new(RwLock::new(ServerConfig::from_env())),
    )
}

/// Parse `key` via `lookup`, falling back to `default` when unset or invalid
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Boolean flag: true/1/yes/on (case-insensitive) are true, anything else false
pub(crate) fn flag_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(default)
}

pub(crate) fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}
