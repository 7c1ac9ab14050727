//! # Controller
//!
//! Core controller modules for the Cluster Resource Controller.
//!
//! - `backoff`: Fibonacci backoff for retrying failed cluster reconciliations
//! - `reconciler`: Capability change detection and discovery publishing
//! - `server`: HTTP server for metrics, probes and discovery documents

pub mod backoff;
pub mod reconciler;
pub mod server;
