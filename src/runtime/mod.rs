//! # Runtime
//!
//! Process-level wiring around the reconciler.
//!
//! - `initialization`: rustls, logging, metrics, HTTP server and Kubernetes client setup
//! - `events`: translation of kube watcher events into cluster lifecycle events
//! - `watch_loop`: the PediaCluster watch, event dispatch and retry scheduling
//! - `error_policy`: watch-error classification and per-cluster retry backoff

pub mod error_policy;
pub mod events;
pub mod initialization;
pub mod watch_loop;

pub use initialization::{initialize, InitializationResult};
pub use watch_loop::run_watch_loop;
