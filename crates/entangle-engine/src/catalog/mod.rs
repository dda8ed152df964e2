//! Member Catalogs
//!
//! A catalog classifies every member visible on a class, its own and every
//! ancestor's, by [`MemberKind`]. Catalogs are built in a single pass and
//! are immutable afterwards; [`CatalogCache`] keeps one per class for the
//! life of the process.
//!
//! ## Classification
//!
//! | Member shape                     | Kind        |
//! |----------------------------------|-------------|
//! | has a method                     | `Invocable` |
//! | has a scalar slot                | `Scalar`    |
//! | has a list slot                  | `Sequence`  |
//! | has a map slot                   | `Mapping`   |
//! | has a stream slot                | `Stream`    |
//!
//! One name may land under several kinds. Names are deduplicated within a
//! kind, never across kinds.

mod cache;

pub use cache::CatalogCache;

use std::collections::{BTreeMap, BTreeSet};
use std::iter;

use entangle_sdk::{ClassId, ClassRef, MemberKind};
use serde::Serialize;

/// Immutable classification of a class's members by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberCatalog {
    origin: ClassId,
    origin_name: String,
    members: BTreeMap<MemberKind, BTreeSet<String>>,
}

impl MemberCatalog {
    /// Reflect a class and all its ancestors.
    ///
    /// Names in `reserved` are skipped. A class with no members yields an
    /// empty catalog.
    pub fn build(class: &ClassRef, reserved: &[String]) -> Self {
        let mut members: BTreeMap<MemberKind, BTreeSet<String>> = BTreeMap::new();

        for declaring in iter::once(class.clone()).chain(class.ancestors()) {
            for (name, member) in declaring.members() {
                if reserved.iter().any(|r| *r == name) {
                    continue;
                }
                for kind in member.kinds() {
                    members.entry(kind).or_default().insert(name.clone());
                }
            }
        }

        Self {
            origin: class.id(),
            origin_name: class.name().to_string(),
            members,
        }
    }

    /// Identity of the reflected class
    pub fn origin(&self) -> ClassId {
        self.origin
    }

    /// Name of the reflected class
    pub fn origin_name(&self) -> &str {
        &self.origin_name
    }

    /// Member names of one kind, sorted
    pub fn names(&self, kind: MemberKind) -> impl Iterator<Item = &str> + '_ {
        self.members.get(&kind).into_iter().flatten().map(String::as_str)
    }

    /// Number of names of one kind
    pub fn count(&self, kind: MemberKind) -> usize {
        self.members.get(&kind).map_or(0, BTreeSet::len)
    }

    /// Check whether a name is cataloged under a kind
    pub fn contains(&self, kind: MemberKind, name: &str) -> bool {
        self.members.get(&kind).is_some_and(|names| names.contains(name))
    }

    /// Every kind a name is cataloged under
    pub fn kinds_of(&self, name: &str) -> Vec<MemberKind> {
        self.members
            .iter()
            .filter(|(_, names)| names.contains(name))
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Iterate `(kind, name)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (MemberKind, &str)> + '_ {
        self.members
            .iter()
            .flat_map(|(kind, names)| names.iter().map(move |n| (*kind, n.as_str())))
    }

    /// Total `(kind, name)` pairs
    pub fn len(&self) -> usize {
        self.members.values().map(BTreeSet::len).sum()
    }

    /// Check if nothing was cataloged
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize for dumps and debugging
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
