//! # PediaCluster Status
//!
//! Status reported for a fleet member: conditions plus the per-group
//! synchronization state of every resource. Every field defaults when absent so
//! partial or malformed reports still deserialize.

use serde::{Deserialize, Serialize};

/// Status of the PediaCluster resource
#[derive(Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PediaClusterStatus {
    /// Conditions represent the latest available observations
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Kubernetes version of the member cluster
    #[serde(default)]
    pub version: Option<String>,
    /// API server the status was collected from
    #[serde(default, rename = "apiserver")]
    pub api_server: Option<String>,
    /// Synchronization state, grouped by API group
    #[serde(default)]
    pub sync_resources: Vec<ClusterGroupResourcesStatus>,
}

/// Synchronization state of the resources within one API group
#[derive(Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterGroupResourcesStatus {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub resources: Vec<ClusterResourceStatus>,
}

/// Synchronization state of a single resource
#[derive(Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResourceStatus {
    /// Resource plural name (e.g. "deployments")
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub namespaced: bool,
    /// One entry per version being synchronized; empty until the first
    /// version starts syncing
    #[serde(default)]
    pub sync_conditions: Vec<ClusterResourceSyncCondition>,
}

/// Per-version synchronization record
#[derive(Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResourceSyncCondition {
    /// Version served to clients
    #[serde(default)]
    pub version: String,
    /// Version actually synchronized from the member, when it differs
    #[serde(default)]
    pub sync_version: Option<String>,
    #[serde(default)]
    pub sync_resource: Option<String>,
    #[serde(default)]
    pub storage_version: Option<String>,
    #[serde(default)]
    pub storage_resource: Option<String>,
    /// Pending, Syncing, Stop, Unknown, Error
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub last_transition_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub r#type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub last_transition_time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
