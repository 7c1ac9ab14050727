//! # Group/Version Schema Builder
//!
//! Lists every capability under each of its versions.

use super::{ApiResource, DiscoveryApis, RestSchemaBuilder};
use crate::capability::CapabilityMap;
use anyhow::Result;
use async_trait::async_trait;

/// Verbs served for every synchronized resource (read-only aggregation)
const READ_VERBS: [&str; 3] = ["get", "list", "watch"];

#[derive(Debug, Clone, Copy, Default)]
pub struct GroupVersionSchemaBuilder;

impl GroupVersionSchemaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Synchronous translation behind the trait impl.
    #[must_use]
    pub fn translate(capabilities: &CapabilityMap) -> DiscoveryApis {
        let mut apis = DiscoveryApis::new();
        for (group_resource, capability) in capabilities {
            for version in &capability.versions {
                apis.add_resource(
                    &group_resource.group,
                    version,
                    ApiResource {
                        name: group_resource.resource.clone(),
                        kind: capability.kind.clone(),
                        namespaced: capability.namespaced,
                        verbs: READ_VERBS.iter().map(|v| (*v).to_string()).collect(),
                    },
                );
            }
        }
        apis
    }
}

#[async_trait]
impl RestSchemaBuilder for GroupVersionSchemaBuilder {
    async fn build(
        &self,
        cluster_name: &str,
        capabilities: &CapabilityMap,
    ) -> Result<DiscoveryApis> {
        tracing::debug!(
            cluster.name = cluster_name,
            resources = capabilities.len(),
            "discovery.schema.build"
        );
        Ok(Self::translate(capabilities))
    }
}
