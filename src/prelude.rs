//! # Prelude
//!
//! Re-exports commonly used types and traits.
//!
//! ```rust
//! use cluster_resource_controller::prelude::*;
//! ```

pub use crate::crd::*;

pub use crate::capability::{
    extract_capabilities, extract_cluster_capabilities, CapabilityMap, GroupResource,
    ResourceCapability,
};

// Collaborator traits, needed to plug in another discovery backend
pub use crate::discovery::{DiscoveryApis, DiscoveryPublisher, RestSchemaBuilder};

pub use crate::controller::reconciler::{
    ClusterEvent, ClusterResourceController, ReconcileOutcome, ReconcilerError,
};

pub use crate::config::{ControllerConfig, ServerConfig};
