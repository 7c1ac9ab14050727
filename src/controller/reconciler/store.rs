//! # Capability Store
//!
//! Last-published capability map per cluster. An entry exists iff that
//! cluster's map was successfully pushed to the discovery publisher and has
//! not been removed since. Only the reconciler touches it.

use crate::capability::CapabilityMap;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct CapabilityStore {
    clusters: HashMap<String, CapabilityMap>,
}

impl CapabilityStore {
    pub(crate) fn get(&self, cluster_name: &str) -> Option<&CapabilityMap> {
        self.clusters.get(cluster_name)
    }

    pub(crate) fn contains(&self, cluster_name: &str) -> bool {
        self.clusters.contains_key(cluster_name)
    }

    /// Whether `capabilities` differs from what was last published.
    ///
    /// An untracked cluster always counts as changed, even with an empty
    /// map: "serves nothing yet" is published and tracked like any other state.
    pub(crate) fn has_changed(&self, cluster_name: &str, capabilities: &CapabilityMap) -> bool {
        match self.clusters.get(cluster_name) {
            Some(published) => !published.same_capabilities(capabilities),
            None => true,
        }
    }

    pub(crate) fn insert(&mut self, cluster_name: String, capabilities: CapabilityMap) {
        self.clusters.insert(cluster_name, capabilities);
    }

    pub(crate) fn remove(&mut self, cluster_name: &str) -> Option<CapabilityMap> {
        self.clusters.remove(cluster_name)
    }

    pub(crate) fn len(&self) -> usize {
        self.clusters.len()
    }

    pub(crate) fn cluster_names(&self) -> impl Iterator<Item = &str> {
        self.clusters.keys().map(String::as_str)
    }
}
