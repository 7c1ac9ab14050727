//! Cluster Resource Controller Library
//!
//! Watches PediaCluster resources, extracts the set of resources each member
//! cluster is synchronizing, and keeps the aggregated discovery view in step
//! with those capabilities. Tests are included in the module files and under
//! `tests/`.
//!
//! ## Quick Start
//!
//! ```rust
//! use cluster_resource_controller::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod capability;
pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod discovery;
pub mod observability;
pub mod prelude;
pub mod runtime;
