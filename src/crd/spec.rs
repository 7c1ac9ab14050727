//! # PediaCluster Spec
//!
//! Main CRD specification types.

use serde::{Deserialize, Serialize};

/// PediaCluster Custom Resource Definition
///
/// A member of the managed fleet. The spec says which resources the cluster
/// should synchronize; the status reports, per API group, which resources are
/// actually synchronized and at which versions.
///
/// # Example
///
/// ```yaml
/// apiVersion: cluster.clusterpedia.io/v1alpha2
/// kind: PediaCluster
/// metadata:
///   name: cluster-east
/// spec:
///   apiserver: https://10.0.0.1:6443
///   syncResources:
///     - group: apps
///       resources: ["deployments"]
/// ```
#[derive(
    kube::CustomResource, Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema,
)]
#[kube(
    kind = "PediaCluster",
    group = "cluster.clusterpedia.io",
    version = "v1alpha2",
    status = "crate::crd::PediaClusterStatus",
    shortname = "pc",
    printcolumn = r#"{"name":"APIServer", "type":"string", "jsonPath":".spec.apiserver"}, {"name":"Version", "type":"string", "jsonPath":".status.version"}, {"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// API server address of the member cluster
    #[serde(default)]
    pub apiserver: Option<String>,
    /// Base64 kubeconfig used to reach the member cluster
    #[serde(default)]
    pub kubeconfig: Option<String>,
    /// Resources the cluster is asked to synchronize
    #[serde(default)]
    pub sync_resources: Vec<ClusterGroupResources>,
    /// Synchronize every custom resource the member cluster serves
    #[serde(default)]
    pub sync_all_custom_resources: bool,
}

/// Requested resources within one API group
#[derive(Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterGroupResources {
    /// API group ("" for the core group)
    #[serde(default)]
    pub group: String,
    /// Versions to synchronize; empty means all served versions
    #[serde(default)]
    pub versions: Vec<String>,
    /// Resource plural names; `*` selects every resource in the group
    #[serde(default)]
    pub resources: Vec<String>,
}
