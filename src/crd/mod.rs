//! # Custom Resource Definitions
//!
//! CRD types for the `PediaCluster` resource.
//!
//! ## Module Structure
//!
//! - `spec.rs` - `PediaCluster` specification (what the fleet member is asked to sync)
//! - `status.rs` - Reported sync status, grouped by API group

mod spec;
mod status;

pub use spec::{ClusterGroupResources, ClusterSpec, PediaCluster};
pub use status::{
    ClusterGroupResourcesStatus, ClusterResourceStatus, ClusterResourceSyncCondition, Condition,
    PediaClusterStatus,
};

/// Store key for a cluster object.
///
/// `namespace/name` when the object carries a namespace, `name` otherwise.
/// `PediaCluster` is cluster-scoped, so in practice this is the bare name.
/// Returns `None` for objects without a name, which cannot be tracked.
#[must_use]
pub fn cluster_key(cluster: &PediaCluster) -> Option<String> {
    let name = cluster.metadata.name.as_deref().filter(|n| !n.is_empty())?;
    match cluster.metadata.namespace.as_deref() {
        Some(namespace) if !namespace.is_empty() => Some(format!("{namespace}/{name}")),
        _ => Some(name.to_string()),
    }
}

/// Whether the object carries a pending-deletion marker.
#[must_use]
pub fn is_terminating(cluster: &PediaCluster) -> bool {
    cluster.metadata.deletion_timestamp.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_from(value: serde_json::Value) -> PediaCluster {
        serde_json::from_value(value).expect("valid PediaCluster")
    }

    #[test]
    fn test_cluster_key_uses_bare_name_for_cluster_scoped_objects() {
        let cluster = cluster_from(serde_json::json!({
            "apiVersion": "cluster.clusterpedia.io/v1alpha2",
            "kind": "PediaCluster",
            "metadata": { "name": "c1" },
            "spec": {}
        }));
        assert_eq!(cluster_key(&cluster).as_deref(), Some("c1"));
    }

    #[test]
    fn test_cluster_key_prefixes_namespace_when_present() {
        let cluster = cluster_from(serde_json::json!({
            "apiVersion": "cluster.clusterpedia.io/v1alpha2",
            "kind": "PediaCluster",
            "metadata": { "name": "c1", "namespace": "fleet" },
            "spec": {}
        }));
        assert_eq!(cluster_key(&cluster).as_deref(), Some("fleet/c1"));
    }

    #[test]
    fn test_cluster_key_none_without_name() {
        let cluster = cluster_from(serde_json::json!({
            "apiVersion": "cluster.clusterpedia.io/v1alpha2",
            "kind": "PediaCluster",
            "metadata": {},
            "spec": {}
        }));
        assert!(cluster_key(&cluster).is_none());
    }

    #[test]
    fn test_is_terminating_reads_deletion_timestamp() {
        let live = cluster_from(serde_json::json!({
            "apiVersion": "cluster.clusterpedia.io/v1alpha2",
            "kind": "PediaCluster",
            "metadata": { "name": "c1" },
            "spec": {}
        }));
        let terminating = cluster_from(serde_json::json!({
            "apiVersion": "cluster.clusterpedia.io/v1alpha2",
            "kind": "PediaCluster",
            "metadata": { "name": "c1", "deletionTimestamp": "2024-05-01T10:00:00Z" },
            "spec": {}
        }));
        assert!(!is_terminating(&live));
        assert!(is_terminating(&terminating));
    }
}
