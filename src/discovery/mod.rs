//! # Discovery Collaborators
//!
//! The controller publishes through two collaborators:
//! - `RestSchemaBuilder` turns a cluster's `CapabilityMap` into a
//!   discovery-ready `DiscoveryApis`
//! - `DiscoveryPublisher` stores and serves the per-cluster discovery state
//!
//! In-process implementations of both live in `schema.rs` and `publisher.rs`.

use crate::capability::CapabilityMap;
use anyhow::Result;
use async_trait::async_trait;

mod publisher;
mod schema;
mod types;

pub use publisher::{AggregatedGroup, InMemoryDiscoveryPublisher};
pub use schema::GroupVersionSchemaBuilder;
pub use types::{ApiResource, DiscoveryApis};

/// Builds the routable discovery representation of a cluster's capabilities
#[async_trait]
pub trait RestSchemaBuilder: Send + Sync {
    /// Translate `capabilities` for `cluster_name`.
    ///
    /// Keyed by cluster only; must not touch any other cluster's state.
    async fn build(&self, cluster_name: &str, capabilities: &CapabilityMap)
        -> Result<DiscoveryApis>;
}

/// Stores and serves aggregated discovery documents
#[async_trait]
pub trait DiscoveryPublisher: Send + Sync {
    /// Replace (never merge) the published discovery state of `cluster_name`
    async fn set_cluster(&self, cluster_name: &str, apis: DiscoveryApis) -> Result<()>;

    /// Drop every published entry of `cluster_name`
    async fn remove_cluster(&self, cluster_name: &str) -> Result<()>;
}
