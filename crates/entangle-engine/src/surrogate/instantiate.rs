//! Surrogate instantiation

use entangle_sdk::{ClassRef, Object, ObjectRef, Value};

/// Create an instance of a surrogate class.
///
/// Attributes are taken as given; nothing is checked against the catalog.
/// Strategies that expect e.g. a wrapped original must be handed one here.
pub fn instantiate<K: Into<String>>(
    surrogate: &ClassRef,
    attributes: impl IntoIterator<Item = (K, Value)>,
) -> ObjectRef {
    Object::new(surrogate, attributes)
}
