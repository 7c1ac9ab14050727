//! # Resource Capabilities
//!
//! Normalized view of the API resources a cluster currently synchronizes.
//!
//! - `types.rs` - `GroupResource`, `ResourceCapability` and `CapabilityMap`
//! - `extract.rs` - derivation of a `CapabilityMap` from a reported sync status

mod extract;
mod types;

pub use extract::{extract_capabilities, extract_cluster_capabilities};
pub use types::{CapabilityMap, GroupResource, ResourceCapability};
