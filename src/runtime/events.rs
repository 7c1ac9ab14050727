//! # Watch Event Translation
//!
//! The kube watcher reports `Apply`/`Delete` plus relist markers
//! (`Init`, `InitApply`, `InitDone`). This module keeps the last seen object
//! per cluster so applies become `Added` or `Updated { old, new }`, and so a
//! relist can report clusters that disappeared while the watch was down.

use crate::controller::reconciler::ClusterEvent;
use crate::crd::{cluster_key, PediaCluster};
use kube_runtime::watcher;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ClusterEventTranslator {
    known: HashMap<String, Arc<PediaCluster>>,
    /// Keys seen since the last `Init`, while a relist is in progress
    relisted: Option<HashSet<String>>,
    synced: bool,
}

impl ClusterEventTranslator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle events for one watcher event, in delivery order
    pub fn translate(&mut self, event: watcher::Event<PediaCluster>) -> Vec<ClusterEvent> {
        match event {
            watcher::Event::Init => {
                self.relisted = Some(HashSet::new());
                Vec::new()
            }
            watcher::Event::InitApply(cluster) => {
                if let (Some(seen), Some(key)) = (self.relisted.as_mut(), cluster_key(&cluster)) {
                    seen.insert(key);
                }
                vec![self.apply(cluster)]
            }
            watcher::Event::InitDone => {
                self.synced = true;
                let Some(seen) = self.relisted.take() else {
                    return Vec::new();
                };
                let mut gone: Vec<String> = self
                    .known
                    .keys()
                    .filter(|key| !seen.contains(*key))
                    .cloned()
                    .collect();
                gone.sort();
                for key in &gone {
                    self.known.remove(key);
                }
                gone.into_iter().map(ClusterEvent::Deleted).collect()
            }
            watcher::Event::Apply(cluster) => vec![self.apply(cluster)],
            watcher::Event::Delete(cluster) => match cluster_key(&cluster) {
                Some(key) => {
                    self.known.remove(&key);
                    vec![ClusterEvent::Deleted(key)]
                }
                None => Vec::new(),
            },
        }
    }

    fn apply(&mut self, cluster: PediaCluster) -> ClusterEvent {
        let new = Arc::new(cluster);
        let Some(key) = cluster_key(&new) else {
            // Unkeyable; the reconciler skips it with a warning
            return ClusterEvent::Added(new);
        };
        match self.known.insert(key, Arc::clone(&new)) {
            Some(old) => ClusterEvent::Updated {
                old: Some(old),
                new,
            },
            None => ClusterEvent::Added(new),
        }
    }

    /// Last object seen for `name`, if it still exists
    #[must_use]
    pub fn latest(&self, name: &str) -> Option<Arc<PediaCluster>> {
        self.known.get(name).cloned()
    }

    /// Whether the first full list has been delivered
    #[must_use]
    pub fn has_synced(&self) -> bool {
        self.synced
    }
}
