//! # Capability Extraction
//!
//! Pure translation from a reported sync status into a `CapabilityMap`.

use super::{CapabilityMap, GroupResource, ResourceCapability};
use crate::crd::{ClusterGroupResourcesStatus, PediaCluster};

/// Derive the capability map from per-group sync status.
///
/// Resources without sync conditions are not yet usable and are skipped.
/// Versions collapse into a set. A key repeated in the input keeps its last
/// occurrence. Never fails: missing fields have already defaulted to empty
/// values during deserialization.
#[must_use]
pub fn extract_capabilities(sync_resources: &[ClusterGroupResourcesStatus]) -> CapabilityMap {
    let mut capabilities = CapabilityMap::new();

    for group_resources in sync_resources {
        for resource in &group_resources.resources {
            if resource.sync_conditions.is_empty() {
                continue;
            }

            let versions = resource
                .sync_conditions
                .iter()
                .map(|condition| condition.version.clone())
                .collect();

            capabilities.insert(
                GroupResource::new(group_resources.group.clone(), resource.name.clone()),
                ResourceCapability {
                    namespaced: resource.namespaced,
                    kind: resource.kind.clone(),
                    versions,
                },
            );
        }
    }

    capabilities
}

/// Capability map for a whole cluster object; a missing status is empty.
#[must_use]
pub fn extract_cluster_capabilities(cluster: &PediaCluster) -> CapabilityMap {
    cluster
        .status
        .as_ref()
        .map(|status| extract_capabilities(&status.sync_resources))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{ClusterResourceStatus, ClusterResourceSyncCondition};

    fn resource(name: &str, kind: &str, namespaced: bool, versions: &[&str]) -> ClusterResourceStatus {
        ClusterResourceStatus {
            name: name.to_string(),
            kind: kind.to_string(),
            namespaced,
            sync_conditions: versions
                .iter()
                .map(|v| ClusterResourceSyncCondition {
                    version: (*v).to_string(),
                    status: "Syncing".to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn group(name: &str, resources: Vec<ClusterResourceStatus>) -> ClusterGroupResourcesStatus {
        ClusterGroupResourcesStatus {
            group: name.to_string(),
            resources,
        }
    }

    #[test]
    fn test_extracts_namespaced_kind_and_versions() {
        let status = vec![group(
            "apps",
            vec![resource("deployments", "Deployment", true, &["v1", "v1beta1"])],
        )];

        let map = extract_capabilities(&status);

        assert_eq!(map.len(), 1);
        let deployments = map
            .get(&GroupResource::new("apps", "deployments"))
            .expect("deployments extracted");
        assert!(deployments.namespaced);
        assert_eq!(deployments.kind, "Deployment");
        assert_eq!(
            deployments.versions.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["v1", "v1beta1"]
        );
    }

    #[test]
    fn test_skips_resources_without_sync_conditions() {
        let status = vec![group(
            "apps",
            vec![
                resource("deployments", "Deployment", true, &[]),
                resource("statefulsets", "StatefulSet", true, &["v1"]),
            ],
        )];

        let map = extract_capabilities(&status);

        assert!(!map.contains(&GroupResource::new("apps", "deployments")));
        assert!(map.contains(&GroupResource::new("apps", "statefulsets")));
    }

    #[test]
    fn test_duplicate_versions_collapse() {
        let status = vec![group(
            "",
            vec![resource("pods", "Pod", true, &["v1", "v1", "v1"])],
        )];

        let map = extract_capabilities(&status);

        let pods = map.get(&GroupResource::new("", "pods")).expect("pods extracted");
        assert_eq!(pods.versions.len(), 1);
    }

    #[test]
    fn test_later_duplicate_key_wins() {
        let status = vec![
            group("apps", vec![resource("deployments", "Deployment", true, &["v1"])]),
            group("apps", vec![resource("deployments", "Deployment", false, &["v2"])]),
        ];

        let map = extract_capabilities(&status);

        let deployments = map
            .get(&GroupResource::new("apps", "deployments"))
            .expect("deployments extracted");
        assert!(!deployments.namespaced);
        assert!(deployments.versions.contains("v2"));
        assert!(!deployments.versions.contains("v1"));
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let status = vec![
            group("apps", vec![resource("deployments", "Deployment", true, &["v1"])]),
            group("batch", vec![resource("jobs", "Job", true, &["v1", "v1beta1"])]),
        ];

        assert_eq!(extract_capabilities(&status), extract_capabilities(&status));
    }

    #[test]
    fn test_cluster_without_status_is_empty() {
        let cluster = PediaCluster::new("c1", crate::crd::ClusterSpec::default());
        assert!(extract_cluster_capabilities(&cluster).is_empty());
    }
}
