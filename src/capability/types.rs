//! # Capability Types

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identity of one capability map entry: API group plus resource plural name.
///
/// The derived ordering only gives maps a stable iteration order for logs and
/// HTTP output; it carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupResource {
    pub group: String,
    pub resource: String,
}

impl GroupResource {
    #[must_use]
    pub fn new(group: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            resource: resource.into(),
        }
    }
}

impl fmt::Display for GroupResource {
    /// `resource.group`, or just `resource` for the core group (kubectl style).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            f.write_str(&self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// What a cluster exposes for one group-resource.
#[derive(Debug, Clone, Default, Eq)]
pub struct ResourceCapability {
    pub namespaced: bool,
    pub kind: String,
    /// Distinct versions drawn from the resource's sync conditions
    pub versions: BTreeSet<String>,
}

impl ResourceCapability {
    /// Field-wise equality; versions compare as sets.
    #[must_use]
    pub fn same_capability(&self, other: &Self) -> bool {
        self.namespaced == other.namespaced
            && self.kind == other.kind
            && self.versions == other.versions
    }
}

impl PartialEq for ResourceCapability {
    fn eq(&self, other: &Self) -> bool {
        self.same_capability(other)
    }
}

/// Everything one cluster currently exposes as synchronized.
#[derive(Debug, Clone, Default, Eq)]
pub struct CapabilityMap {
    entries: BTreeMap<GroupResource, ResourceCapability>,
}

impl CapabilityMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous entry for the same key.
    pub fn insert(&mut self, key: GroupResource, capability: ResourceCapability) {
        self.entries.insert(key, capability);
    }

    #[must_use]
    pub fn get(&self, key: &GroupResource) -> Option<&ResourceCapability> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &GroupResource) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupResource, &ResourceCapability)> {
        self.entries.iter()
    }

    /// Distinct API groups present in the map.
    #[must_use]
    pub fn groups(&self) -> BTreeSet<&str> {
        self.entries.keys().map(|gr| gr.group.as_str()).collect()
    }

    /// Structural equality used for change detection.
    ///
    /// Same key set, and for every key identical `namespaced`, `kind` and
    /// version set. Version order never matters.
    #[must_use]
    pub fn same_capabilities(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(key, capability)| {
                other
                    .entries
                    .get(key)
                    .is_some_and(|theirs| capability.same_capability(theirs))
            })
    }
}

impl PartialEq for CapabilityMap {
    fn eq(&self, other: &Self) -> bool {
        self.same_capabilities(other)
    }
}

impl FromIterator<(GroupResource, ResourceCapability)> for CapabilityMap {
    fn from_iter<I: IntoIterator<Item = (GroupResource, ResourceCapability)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, capability) in iter {
            map.insert(key, capability);
        }
        map
    }
}

impl<'a> IntoIterator for &'a CapabilityMap {
    type Item = (&'a GroupResource, &'a ResourceCapability);
    type IntoIter = std::collections::btree_map::Iter<'a, GroupResource, ResourceCapability>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Flat entry view, since JSON object keys cannot be structs.
struct CapabilityEntry<'a> {
    key: &'a GroupResource,
    capability: &'a ResourceCapability,
}

impl Serialize for CapabilityEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entry = serializer.serialize_struct("CapabilityEntry", 5)?;
        entry.serialize_field("group", &self.key.group)?;
        entry.serialize_field("resource", &self.key.resource)?;
        entry.serialize_field("namespaced", &self.capability.namespaced)?;
        entry.serialize_field("kind", &self.capability.kind)?;
        entry.serialize_field("versions", &self.capability.versions)?;
        entry.end()
    }
}

impl Serialize for CapabilityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.entries
                .iter()
                .map(|(key, capability)| CapabilityEntry { key, capability }),
        )
    }
}
