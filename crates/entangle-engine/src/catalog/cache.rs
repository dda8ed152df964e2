//! Process-lifetime catalog cache

use std::sync::Arc;

use entangle_sdk::{ClassId, ClassRef};
use rustc_hash::FxHashMap;

use super::MemberCatalog;

/// Memoized catalogs keyed by class identity.
///
/// The first request for a class builds its catalog; later requests return
/// the same `Arc`, even if the class's members have changed since. A
/// catalog is a snapshot, not a live view.
#[derive(Debug, Default)]
pub struct CatalogCache {
    catalogs: FxHashMap<ClassId, Arc<MemberCatalog>>,
}

impl CatalogCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached catalog for a class, building it on first request
    pub fn get_or_build(&mut self, class: &ClassRef, reserved: &[String]) -> Arc<MemberCatalog> {
        if let Some(catalog) = self.catalogs.get(&class.id()) {
            tracing::debug!(class = class.name(), "catalog cache hit");
            return Arc::clone(catalog);
        }

        let catalog = Arc::new(MemberCatalog::build(class, reserved));
        tracing::debug!(
            class = class.name(),
            members = catalog.len(),
            "built member catalog"
        );
        self.catalogs.insert(class.id(), Arc::clone(&catalog));
        catalog
    }

    /// Cached catalog for an identity, if built
    pub fn get(&self, id: ClassId) -> Option<Arc<MemberCatalog>> {
        self.catalogs.get(&id).cloned()
    }

    /// Check whether a class has been cataloged
    pub fn contains(&self, id: ClassId) -> bool {
        self.catalogs.contains_key(&id)
    }

    /// Number of cached catalogs
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    /// Check if nothing has been cataloged
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entangle_sdk::{Class, MemberKind, Value};
    use parking_lot::Mutex;
    use std::io;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_cache_hits_logged_at_debug() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut cache = CatalogCache::new();
        let class = Class::builder("Logged").field("count", 0).build();
        tracing::subscriber::with_default(subscriber, || {
            cache.get_or_build(&class, &[]);
            cache.get_or_build(&class, &[]);
        });

        let output = String::from_utf8(capture.0.lock().clone()).unwrap();
        let hit = output
            .lines()
            .find(|line| line.contains("catalog cache hit"))
            .expect("cache hit logged");
        assert!(hit.contains("DEBUG"));
        assert!(hit.contains("Logged"));
    }

    #[test]
    fn test_get_or_build_memoizes() {
        let mut cache = CatalogCache::new();
        let class = Class::builder("Greeter").field("count", 0).build();

        let first = cache.get_or_build(&class, &[]);
        let second = cache.get_or_build(&class, &[]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(class.id()));
    }

    #[test]
    fn test_catalog_is_a_snapshot() {
        let mut cache = CatalogCache::new();
        let class = Class::builder("Greeter").field("count", 0).build();

        let before = cache.get_or_build(&class, &[]);
        class.define_method("late", |_| Ok(Value::Null));
        let after = cache.get_or_build(&class, &[]);

        assert!(Arc::ptr_eq(&before, &after));
        assert!(!after.contains(MemberKind::Invocable, "late"));
    }

    #[test]
    fn test_distinct_classes_get_distinct_catalogs() {
        let mut cache = CatalogCache::new();
        let a = Class::builder("A").build();
        let b = Class::builder("A").build();

        let ca = cache.get_or_build(&a, &[]);
        let cb = cache.get_or_build(&b, &[]);
        assert!(!Arc::ptr_eq(&ca, &cb));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(a.id()).is_some());
    }
}
