//! # Types
//!
//! Events, outcomes and errors of the reconciler.

use crate::crd::PediaCluster;
use std::sync::Arc;
use thiserror::Error;

/// Collaborator failure while reconciling one cluster.
///
/// The capability store is left untouched whenever one of these is returned,
/// so the next event for the cluster retries the whole sequence.
#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("building discovery schema for cluster {cluster} failed: {source}")]
    SchemaBuild {
        cluster: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("publishing discovery for cluster {cluster} failed: {source}")]
    Publish {
        cluster: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("removing discovery for cluster {cluster} failed: {source}")]
    Unpublish {
        cluster: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ReconcilerError {
    /// Cluster the failed operation was keyed by
    #[must_use]
    pub fn cluster(&self) -> &str {
        match self {
            ReconcilerError::SchemaBuild { cluster, .. }
            | ReconcilerError::Publish { cluster, .. }
            | ReconcilerError::Unpublish { cluster, .. } => cluster,
        }
    }

    /// Metric label for the failed collaborator call
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            ReconcilerError::SchemaBuild { .. } => "schema_build",
            ReconcilerError::Publish { .. } => "publish",
            ReconcilerError::Unpublish { .. } => "unpublish",
        }
    }
}

/// What a lifecycle operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A changed capability map was published and stored
    Published { resources: usize },
    /// Capabilities matched the last published map; no collaborator call
    Unchanged,
    /// Published state and store entry were removed
    Removed,
    /// Removal of a cluster with no store entry; no collaborator call
    NotTracked,
    /// The object could not be keyed (no name)
    Skipped,
}

impl ReconcileOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Published { .. } => "published",
            ReconcileOutcome::Unchanged => "unchanged",
            ReconcileOutcome::Removed => "removed",
            ReconcileOutcome::NotTracked => "not-tracked",
            ReconcileOutcome::Skipped => "skipped",
        }
    }
}

/// Cluster lifecycle event as delivered by the watch source
#[derive(Debug, Clone)]
pub enum ClusterEvent {
    Added(Arc<PediaCluster>),
    /// Only `new` and its deletion marker are consulted
    Updated {
        old: Option<Arc<PediaCluster>>,
        new: Arc<PediaCluster>,
    },
    /// Identity sufficient to key the store
    Deleted(String),
}

impl ClusterEvent {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterEvent::Added(_) => "added",
            ClusterEvent::Updated { .. } => "updated",
            ClusterEvent::Deleted(_) => "deleted",
        }
    }

    /// Store key of the affected cluster, if the object can be keyed
    #[must_use]
    pub fn cluster_name(&self) -> Option<String> {
        match self {
            ClusterEvent::Added(cluster) | ClusterEvent::Updated { new: cluster, .. } => {
                crate::crd::cluster_key(cluster)
            }
            ClusterEvent::Deleted(name) => Some(name.clone()),
        }
    }
}
