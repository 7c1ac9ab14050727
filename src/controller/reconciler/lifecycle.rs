//! # Cluster Lifecycle
//!
//! The two lifecycle operations (`on_cluster_upsert`, `on_cluster_remove`)
//! and event dispatch onto them.

use super::store::CapabilityStore;
use super::types::{ClusterEvent, ReconcileOutcome, ReconcilerError};
use crate::capability::{extract_cluster_capabilities, CapabilityMap};
use crate::crd::{cluster_key, is_terminating, PediaCluster};
use crate::discovery::{DiscoveryPublisher, RestSchemaBuilder};
use crate::observability::metrics;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

/// Reconciles cluster lifecycle events into discovery updates.
///
/// The capability store sits behind a single async mutex held for the whole
/// extract → compare → publish → store sequence, so operations are serialized
/// even if events are dispatched from several tasks. Collaborator calls have
/// no timeout here.
pub struct ClusterResourceController {
    schema_builder: Arc<dyn RestSchemaBuilder>,
    publisher: Arc<dyn DiscoveryPublisher>,
    store: AsyncMutex<CapabilityStore>,
}

impl std::fmt::Debug for ClusterResourceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterResourceController")
            .finish_non_exhaustive()
    }
}

impl ClusterResourceController {
    pub fn new(
        schema_builder: Arc<dyn RestSchemaBuilder>,
        publisher: Arc<dyn DiscoveryPublisher>,
    ) -> Self {
        Self {
            schema_builder,
            publisher,
            store: AsyncMutex::new(CapabilityStore::default()),
        }
    }

    /// Route a lifecycle event to its operation.
    pub async fn dispatch(&self, event: ClusterEvent) -> Result<ReconcileOutcome, ReconcilerError> {
        metrics::increment_cluster_events(event.as_str());
        match event {
            ClusterEvent::Added(cluster) | ClusterEvent::Updated { new: cluster, .. } => {
                self.on_cluster_upsert(&cluster).await
            }
            ClusterEvent::Deleted(name) => self.on_cluster_remove(&name).await,
        }
    }

    /// Handle an added or updated cluster.
    ///
    /// A terminating cluster is removed without looking at its status, which
    /// may be stale or partial at that point.
    pub async fn on_cluster_upsert(
        &self,
        cluster: &PediaCluster,
    ) -> Result<ReconcileOutcome, ReconcilerError> {
        let Some(name) = cluster_key(cluster) else {
            warn!("Skipping PediaCluster without a name");
            return Ok(ReconcileOutcome::Skipped);
        };

        if is_terminating(cluster) {
            debug!(cluster.name = name.as_str(), "cluster.terminating");
            return self.on_cluster_remove(&name).await;
        }

        let capabilities = extract_cluster_capabilities(cluster);

        let mut store = self.store.lock().await;
        if !store.has_changed(&name, &capabilities) {
            debug!(
                cluster.name = name.as_str(),
                resources = capabilities.len(),
                "cluster.capabilities.unchanged"
            );
            metrics::increment_unchanged();
            return Ok(ReconcileOutcome::Unchanged);
        }

        let started = Instant::now();
        let apis = self
            .schema_builder
            .build(&name, &capabilities)
            .await
            .map_err(|source| ReconcilerError::SchemaBuild {
                cluster: name.clone(),
                source,
            })?;
        self.publisher
            .set_cluster(&name, apis)
            .await
            .map_err(|source| ReconcilerError::Publish {
                cluster: name.clone(),
                source,
            })?;
        metrics::observe_publish_duration(started.elapsed().as_secs_f64());

        let resources = capabilities.len();
        info!(
            cluster.name = name.as_str(),
            resources,
            groups = capabilities.groups().len(),
            "Published cluster resources to discovery"
        );
        store.insert(name, capabilities);
        metrics::increment_publishes();
        metrics::set_tracked_clusters(store.len());

        Ok(ReconcileOutcome::Published { resources })
    }

    /// Handle a deleted cluster. Unknown clusters are a silent no-op.
    pub async fn on_cluster_remove(&self, name: &str) -> Result<ReconcileOutcome, ReconcilerError> {
        let mut store = self.store.lock().await;
        if !store.contains(name) {
            debug!(cluster.name = name, "cluster.remove.not_tracked");
            return Ok(ReconcileOutcome::NotTracked);
        }

        self.publisher
            .remove_cluster(name)
            .await
            .map_err(|source| ReconcilerError::Unpublish {
                cluster: name.to_string(),
                source,
            })?;
        store.remove(name);

        info!(cluster.name = name, "Removed cluster from discovery");
        metrics::increment_removals();
        metrics::set_tracked_clusters(store.len());

        Ok(ReconcileOutcome::Removed)
    }

    /// Names of the clusters currently tracked, sorted
    pub async fn tracked_clusters(&self) -> Vec<String> {
        let store = self.store.lock().await;
        let mut names: Vec<String> = store.cluster_names().map(str::to_string).collect();
        names.sort();
        names
    }

    /// Snapshot of the last published capability map of a cluster
    pub async fn published_capabilities(&self, name: &str) -> Option<CapabilityMap> {
        self.store.lock().await.get(name).cloned()
    }
}
