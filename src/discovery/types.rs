//! # Discovery Types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One resource as listed in a group-version discovery document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResource {
    pub name: String,
    pub kind: String,
    pub namespaced: bool,
    pub verbs: Vec<String>,
}

/// Discovery-ready view of one cluster: group → version → resources.
///
/// Resources within a version are sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryApis {
    groups: BTreeMap<String, BTreeMap<String, Vec<ApiResource>>>,
}

impl DiscoveryApis {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `resource` under `group`/`version`, keeping the list sorted.
    pub fn add_resource(&mut self, group: &str, version: &str, resource: ApiResource) {
        let resources = self
            .groups
            .entry(group.to_string())
            .or_default()
            .entry(version.to_string())
            .or_default();
        let at = resources.partition_point(|existing| existing.name < resource.name);
        resources.insert(at, resource);
    }

    #[must_use]
    pub fn resources(&self, group: &str, version: &str) -> Option<&[ApiResource]> {
        self.groups
            .get(group)
            .and_then(|versions| versions.get(version))
            .map(Vec::as_slice)
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn versions(&self, group: &str) -> impl Iterator<Item = &str> {
        self.groups
            .get(group)
            .into_iter()
            .flat_map(|versions| versions.keys().map(String::as_str))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str) -> ApiResource {
        ApiResource {
            name: name.to_string(),
            kind: String::new(),
            namespaced: true,
            verbs: Vec::new(),
        }
    }

    #[test]
    fn test_add_resource_keeps_names_sorted() {
        let mut apis = DiscoveryApis::new();
        apis.add_resource("apps", "v1", resource("statefulsets"));
        apis.add_resource("apps", "v1", resource("daemonsets"));
        apis.add_resource("apps", "v1", resource("deployments"));

        let names: Vec<_> = apis
            .resources("apps", "v1")
            .expect("apps/v1 present")
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["daemonsets", "deployments", "statefulsets"]);
    }

    #[test]
    fn test_versions_of_unknown_group_is_empty() {
        let apis = DiscoveryApis::new();
        assert_eq!(apis.versions("apps").count(), 0);
        assert!(apis.resources("apps", "v1").is_none());
    }
}
