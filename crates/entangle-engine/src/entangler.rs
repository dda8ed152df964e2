//! Entangler context
//!
//! Owns every piece of engine state: the catalog cache, the surrogate
//! registry, named handler strategies and the diagnostic log. State starts
//! empty, fills lazily and is never torn down.

use std::sync::Arc;

use entangle_sdk::{ClassRef, HandlerRegistry, ObjectRef, Value};
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::catalog::{CatalogCache, MemberCatalog};
use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::error::{EngineError, EngineResult};
use crate::options::EntanglerOptions;
use crate::surrogate::{self, SurrogateId, SurrogateKey, SurrogateRegistry, Variation};

/// Surrogate generation context
#[derive(Debug)]
pub struct Entangler {
    options: EntanglerOptions,
    catalogs: CatalogCache,
    surrogates: SurrogateRegistry,
    handlers: HandlerRegistry,
    diagnostics: DiagnosticLog,
}

impl Entangler {
    /// Create a context with default options
    pub fn new() -> Self {
        Self::with_options(EntanglerOptions::default())
    }

    /// Create a context with custom options
    pub fn with_options(options: EntanglerOptions) -> Self {
        let diagnostics = DiagnosticLog::new(options.retain_diagnostics);
        Self {
            options,
            catalogs: CatalogCache::new(),
            surrogates: SurrogateRegistry::new(),
            handlers: HandlerRegistry::new(),
            diagnostics,
        }
    }

    /// Get the options
    pub fn options(&self) -> &EntanglerOptions {
        &self.options
    }

    /// Catalog of a class, built on first request and cached afterwards
    pub fn catalog(&mut self, class: &ClassRef) -> Arc<MemberCatalog> {
        self.catalogs.get_or_build(class, &self.options.reserved_members)
    }

    /// Realize a variation for a cataloged class.
    ///
    /// Idempotent per (origin, label). Named handler strategies are resolved
    /// through [`handlers`](Self::handlers). Redefinitions, name collisions
    /// and unregistered handler names are reported through
    /// [`diagnostics`](Self::diagnostics), never as errors. Handler factories
    /// run while the context is borrowed, so they must not call back into it.
    pub fn build_surrogate(&mut self, catalog: &MemberCatalog, mut variation: Variation) -> SurrogateId {
        let key = SurrogateKey::new(catalog.origin(), variation.label());
        if self.surrogates.get(&key).is_none() {
            for (kind, name) in variation.resolve_named(&self.handlers) {
                self.diagnostics.emit(Diagnostic::UnknownHandler {
                    name,
                    kind,
                    variation: variation.label().to_string(),
                });
            }
        }
        self.surrogates.synthesize(
            catalog,
            &variation,
            &self.options.surrogate_infix,
            &mut self.diagnostics,
        )
    }

    /// Catalog a class and realize a variation in one step
    pub fn entangle(&mut self, class: &ClassRef, variation: Variation) -> SurrogateId {
        let catalog = self.catalog(class);
        self.build_surrogate(&catalog, variation)
    }

    /// Look up an already realized surrogate without building anything
    pub fn surrogate(&self, class: &ClassRef, label: &str) -> Option<SurrogateId> {
        self.surrogates
            .get(&SurrogateKey::new(class.id(), label))
            .cloned()
    }

    /// Class currently bound to a surrogate name
    pub fn definition(&self, id: &SurrogateId) -> Option<ClassRef> {
        self.surrogates.definition(id)
    }

    /// Create an instance of a surrogate
    pub fn instantiate<K: Into<String>>(
        &self,
        id: &SurrogateId,
        attributes: impl IntoIterator<Item = (K, Value)>,
    ) -> EngineResult<ObjectRef> {
        let class = self
            .definition(id)
            .ok_or_else(|| EngineError::UnknownSurrogate(id.name().to_string()))?;
        Ok(surrogate::instantiate(&class, attributes))
    }

    /// Get the catalog cache
    pub fn catalogs(&self) -> &CatalogCache {
        &self.catalogs
    }

    /// Get the surrogate registry
    pub fn surrogates(&self) -> &SurrogateRegistry {
        &self.surrogates
    }

    /// Get the named handler strategies
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Get the named handler strategies for registration
    pub fn handlers_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.handlers
    }

    /// Retained diagnostics, oldest first
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    /// Drain retained diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}

impl Default for Entangler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Process-wide context
// ============================================================================

static GLOBAL: Lazy<Mutex<Entangler>> = Lazy::new(|| Mutex::new(Entangler::new()));

/// The process-wide context used by the free functions below.
///
/// Each free function holds the lock for one call only.
pub fn global() -> &'static Mutex<Entangler> {
    &GLOBAL
}

/// Catalog a class in the process-wide context
pub fn get_catalog(class: &ClassRef) -> Arc<MemberCatalog> {
    global().lock().catalog(class)
}

/// Realize a variation in the process-wide context
pub fn build_surrogate(catalog: &MemberCatalog, variation: Variation) -> SurrogateId {
    global().lock().build_surrogate(catalog, variation)
}

/// Instantiate a surrogate from the process-wide context
pub fn instantiate_surrogate<K: Into<String>>(
    id: &SurrogateId,
    attributes: impl IntoIterator<Item = (K, Value)>,
) -> EngineResult<ObjectRef> {
    let class = global()
        .lock()
        .definition(id)
        .ok_or_else(|| EngineError::UnknownSurrogate(id.name().to_string()))?;
    Ok(surrogate::instantiate(&class, attributes))
}
