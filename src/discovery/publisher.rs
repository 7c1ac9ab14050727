//! # In-Memory Discovery Publisher
//!
//! Holds the published `DiscoveryApis` of every cluster and answers the
//! read-only queries of the HTTP server.

use super::{DiscoveryApis, DiscoveryPublisher};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock};

/// One API group across the fleet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedGroup {
    pub name: String,
    /// Distinct versions served by at least one cluster
    pub versions: Vec<String>,
    /// Clusters serving the group in any version
    pub clusters: Vec<String>,
}

#[derive(Debug, Default)]
pub struct InMemoryDiscoveryPublisher {
    clusters: RwLock<BTreeMap<String, DiscoveryApis>>,
}

impl InMemoryDiscoveryPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Published discovery state of one cluster
    #[must_use]
    pub fn cluster(&self, cluster_name: &str) -> Option<DiscoveryApis> {
        self.clusters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(cluster_name)
            .cloned()
    }

    /// Names of every cluster with published state
    #[must_use]
    pub fn clusters(&self) -> Vec<String> {
        self.clusters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Fleet-wide group list, sorted by group name
    #[must_use]
    pub fn aggregated(&self) -> Vec<AggregatedGroup> {
        let clusters = self.clusters.read().unwrap_or_else(PoisonError::into_inner);

        let mut groups: BTreeMap<&str, (BTreeSet<&str>, BTreeSet<&str>)> = BTreeMap::new();
        for (cluster_name, apis) in clusters.iter() {
            for group in apis.groups() {
                let (versions, members) = groups.entry(group).or_default();
                versions.extend(apis.versions(group));
                members.insert(cluster_name.as_str());
            }
        }

        groups
            .into_iter()
            .map(|(name, (versions, members))| AggregatedGroup {
                name: name.to_string(),
                versions: versions.into_iter().map(str::to_string).collect(),
                clusters: members.into_iter().map(str::to_string).collect(),
            })
            .collect()
    }
}

#[async_trait]
impl DiscoveryPublisher for InMemoryDiscoveryPublisher {
    async fn set_cluster(&self, cluster_name: &str, apis: DiscoveryApis) -> Result<()> {
        let mut clusters = self
            .clusters
            .write()
            .map_err(|e| anyhow!("discovery state lock poisoned: {e}"))?;
        clusters.insert(cluster_name.to_string(), apis);
        Ok(())
    }

    async fn remove_cluster(&self, cluster_name: &str) -> Result<()> {
        let mut clusters = self
            .clusters
            .write()
            .map_err(|e| anyhow!("discovery state lock poisoned: {e}"))?;
        clusters.remove(cluster_name);
        Ok(())
    }
}
