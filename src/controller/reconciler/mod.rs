//! # Reconciler
//!
//! Keeps the discovery layer in step with what each `PediaCluster` reports
//! as synchronized.
//!
//! ## Reconciliation Flow
//!
//! 1. Cluster added or updated: if terminating, remove it (step 4) and stop
//! 2. Extract the capability map from the cluster's sync status
//! 3. If it differs from the last published map: build discovery, publish it,
//!    then record the map in the capability store
//! 4. Cluster deleted: if tracked, remove its discovery state, then its store entry

pub mod lifecycle;
pub(crate) mod store;
pub mod types;

pub use lifecycle::ClusterResourceController;
pub use types::{ClusterEvent, ReconcileOutcome, ReconcilerError};
