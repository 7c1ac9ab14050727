//! Shared fixtures and collaborator doubles for the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset of helpers")]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cluster_resource_controller::capability::CapabilityMap;
use cluster_resource_controller::controller::reconciler::ClusterResourceController;
use cluster_resource_controller::crd::PediaCluster;
use cluster_resource_controller::discovery::{
    DiscoveryApis, DiscoveryPublisher, GroupVersionSchemaBuilder, RestSchemaBuilder,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// `{ "version": v, "status": "Syncing" }` for each version
pub fn conditions(versions: &[&str]) -> Value {
    Value::Array(
        versions
            .iter()
            .map(|v| json!({ "version": v, "syncVersion": v, "status": "Syncing" }))
            .collect(),
    )
}

/// One synced resource entry for a `syncResources[].resources` list
pub fn resource(name: &str, kind: &str, namespaced: bool, versions: &[&str]) -> Value {
    json!({
        "name": name,
        "kind": kind,
        "namespaced": namespaced,
        "syncConditions": conditions(versions),
    })
}

/// A PediaCluster whose status carries `sync_resources` verbatim
pub fn cluster_with_status(name: &str, sync_resources: Value) -> PediaCluster {
    serde_json::from_value(json!({
        "apiVersion": "cluster.clusterpedia.io/v1alpha2",
        "kind": "PediaCluster",
        "metadata": { "name": name },
        "spec": {},
        "status": { "syncResources": sync_resources },
    }))
    .expect("valid PediaCluster fixture")
}

/// `c1` syncing apps/deployments at v1 and v1beta1
pub fn deployments_cluster(name: &str) -> PediaCluster {
    cluster_with_status(
        name,
        json!([{
            "group": "apps",
            "resources": [resource("deployments", "Deployment", true, &["v1", "v1beta1"])],
        }]),
    )
}

/// Same cluster with a deletion timestamp set
pub fn terminating(cluster: &PediaCluster) -> PediaCluster {
    let mut value = serde_json::to_value(cluster).expect("serializable cluster");
    value["metadata"]["deletionTimestamp"] = json!("2024-01-01T00:00:00Z");
    serde_json::from_value(value).expect("valid terminating cluster")
}

/// Records every build call and delegates to the real builder
#[derive(Default)]
pub struct RecordingSchemaBuilder {
    pub calls: Mutex<Vec<(String, CapabilityMap)>>,
    pub fail: AtomicBool,
}

impl RecordingSchemaBuilder {
    pub fn calls(&self) -> Vec<(String, CapabilityMap)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RestSchemaBuilder for RecordingSchemaBuilder {
    async fn build(&self, cluster_name: &str, capabilities: &CapabilityMap) -> Result<DiscoveryApis> {
        self.calls
            .lock()
            .unwrap()
            .push((cluster_name.to_string(), capabilities.clone()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("schema build failed"));
        }
        Ok(GroupVersionSchemaBuilder::translate(capabilities))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PublisherCall {
    Set(String, DiscoveryApis),
    Remove(String),
}

/// Records publisher calls; either operation can be made to fail
#[derive(Default)]
pub struct RecordingPublisher {
    pub calls: Mutex<Vec<PublisherCall>>,
    pub fail_set: AtomicBool,
    pub fail_remove: AtomicBool,
}

impl RecordingPublisher {
    pub fn calls(&self) -> Vec<PublisherCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, PublisherCall::Set(..)))
            .count()
    }

    pub fn remove_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, PublisherCall::Remove(_)))
            .count()
    }
}

#[async_trait]
impl DiscoveryPublisher for RecordingPublisher {
    async fn set_cluster(&self, cluster_name: &str, apis: DiscoveryApis) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(PublisherCall::Set(cluster_name.to_string(), apis));
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(anyhow!("set_cluster failed"));
        }
        Ok(())
    }

    async fn remove_cluster(&self, cluster_name: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(PublisherCall::Remove(cluster_name.to_string()));
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(anyhow!("remove_cluster failed"));
        }
        Ok(())
    }
}

pub struct Harness {
    pub controller: ClusterResourceController,
    pub builder: Arc<RecordingSchemaBuilder>,
    pub publisher: Arc<RecordingPublisher>,
}

pub fn harness() -> Harness {
    let builder = Arc::new(RecordingSchemaBuilder::default());
    let publisher = Arc::new(RecordingPublisher::default());
    let controller = ClusterResourceController::new(
        Arc::clone(&builder) as Arc<dyn RestSchemaBuilder>,
        Arc::clone(&publisher) as Arc<dyn DiscoveryPublisher>,
    );
    Harness {
        controller,
        builder,
        publisher,
    }
}
