//! # Observability
//!
//! - `metrics`: Prometheus metrics collection
//! - `logging`: tracing subscriber setup
//!
//! Structured logging itself goes through `tracing` macros at the call sites.

pub mod logging;
pub mod metrics;
