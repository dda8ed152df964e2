//! Surrogate Registry
//!
//! Records which (origin, variation) pairs have been realized, and under
//! which name, so that every pair is synthesized at most once.

use std::fmt;
use std::sync::Arc;

use entangle_sdk::{ClassId, ClassRef};
use rustc_hash::FxHashMap;

use super::synthesizer::{surrogate_name, synthesize};
use super::Variation;
use crate::catalog::MemberCatalog;
use crate::diagnostics::{Diagnostic, DiagnosticLog};

/// Handle naming a synthesized surrogate type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurrogateId(Arc<str>);

impl SurrogateId {
    fn new(name: &str) -> Self {
        SurrogateId(Arc::from(name))
    }

    /// Surrogate type name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurrogateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry key: origin identity plus variation label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurrogateKey {
    /// Origin class identity
    pub origin: ClassId,
    /// Variation label
    pub variation: String,
}

impl SurrogateKey {
    /// Create a key
    pub fn new(origin: ClassId, variation: &str) -> Self {
        Self {
            origin,
            variation: variation.to_string(),
        }
    }
}

/// Owner of a surrogate name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameOwner {
    /// Owning pair
    pub key: SurrogateKey,
    /// Origin class name, for messages
    pub origin_name: String,
}

/// Registry of synthesized surrogate types
#[derive(Debug, Default)]
pub struct SurrogateRegistry {
    /// (origin, variation) -> surrogate
    by_key: FxHashMap<SurrogateKey, SurrogateId>,
    /// Reverse mapping: surrogate -> pair that last defined it
    origins: FxHashMap<SurrogateId, SurrogateKey>,
    /// Used names and the pair owning each
    used_names: FxHashMap<String, NameOwner>,
    /// Current definition bound to each name
    definitions: FxHashMap<String, ClassRef>,
}

impl SurrogateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the surrogate for `(catalog origin, variation label)`,
    /// synthesizing it on first request.
    ///
    /// A repeat request carrying strategies is reported as a
    /// [`Diagnostic::Redefinition`] and otherwise ignored. A first request
    /// whose name is already owned by another pair is reported as a
    /// [`Diagnostic::NameCollision`] and rebinds the name.
    pub fn synthesize(
        &mut self,
        catalog: &MemberCatalog,
        variation: &Variation,
        infix: &str,
        log: &mut DiagnosticLog,
    ) -> SurrogateId {
        let key = SurrogateKey::new(catalog.origin(), variation.label());

        if let Some(existing) = self.by_key.get(&key) {
            if variation.has_strategies() {
                log.emit(Diagnostic::Redefinition {
                    origin: catalog.origin_name().to_string(),
                    variation: key.variation.clone(),
                    surrogate: existing.name().to_string(),
                });
            }
            return existing.clone();
        }

        let name = match variation.type_name_override() {
            Some(name) => name.to_string(),
            None => surrogate_name(
                catalog.origin_name(),
                catalog.origin(),
                infix,
                variation.label(),
            ),
        };

        let owner = NameOwner {
            key: key.clone(),
            origin_name: catalog.origin_name().to_string(),
        };
        if let Some(previous) = self.used_names.insert(name.clone(), owner) {
            log.emit(Diagnostic::NameCollision {
                name: name.clone(),
                previous_origin: previous.origin_name,
                previous_variation: previous.key.variation,
                origin: catalog.origin_name().to_string(),
                variation: key.variation.clone(),
            });
        }

        let class = synthesize(&name, catalog, variation);
        let id = SurrogateId::new(&name);
        self.definitions.insert(name, class);
        self.origins.insert(id.clone(), key.clone());
        self.by_key.insert(key, id.clone());
        id
    }

    /// Surrogate already realized for a pair
    pub fn get(&self, key: &SurrogateKey) -> Option<&SurrogateId> {
        self.by_key.get(key)
    }

    /// Current definition bound to a surrogate's name
    pub fn definition(&self, id: &SurrogateId) -> Option<ClassRef> {
        self.definitions.get(id.name()).cloned()
    }

    /// Pair that last defined a surrogate
    pub fn origin_of(&self, id: &SurrogateId) -> Option<&SurrogateKey> {
        self.origins.get(id)
    }

    /// Pair owning a surrogate name
    pub fn owner_of(&self, name: &str) -> Option<&NameOwner> {
        self.used_names.get(name)
    }

    /// Variation labels realized for an origin, sorted
    pub fn variations_of(&self, origin: ClassId) -> Vec<String> {
        let mut labels: Vec<String> = self
            .by_key
            .keys()
            .filter(|k| k.origin == origin)
            .map(|k| k.variation.clone())
            .collect();
        labels.sort();
        labels
    }

    /// Number of realized pairs
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Check if nothing has been realized
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
