//! Integration tests for the process-wide free functions
//!
//! Tests in this binary share one context, so each uses its own classes.

use std::sync::Arc;
use std::thread;

use entangle_engine::strategies::{delegate_to, WRAPPED_ATTRIBUTE};
use entangle_engine::{
    build_surrogate, get_catalog, global, instantiate_surrogate, Diagnostic, EngineError,
    Entangler, SurrogateId, Variation,
};
use entangle_sdk::{Class, ClassRef, MemberKind, Object, Value};

fn counter(name: &str) -> ClassRef {
    Class::builder(name)
        .method("next", |args| {
            let start = args.get(1).and_then(Value::as_int).unwrap_or(0);
            Ok(Value::Int(start + 1))
        })
        .field("total", 0)
        .build()
}

#[test]
fn test_get_catalog_is_cached_process_wide() {
    let class = counter("GlobalCached");
    let first = get_catalog(&class);
    let second = get_catalog(&class);

    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.contains(MemberKind::Invocable, "next"));
    assert!(global().lock().catalogs().contains(class.id()));
}

#[test]
fn test_build_and_instantiate() {
    let class = counter("GlobalCounter");
    let catalog = get_catalog(&class);
    let id = build_surrogate(
        &catalog,
        Variation::default().forward_with(delegate_to(WRAPPED_ATTRIBUTE)),
    );
    assert_eq!(id.name(), format!("GlobalCounter{}$Surrogate$default", class.id()));

    let original = Object::new(&class, Vec::<(String, Value)>::new());
    let proxy = instantiate_surrogate(&id, [(WRAPPED_ATTRIBUTE, Value::Object(original))]).unwrap();
    assert_eq!(proxy.call("next", &[Value::Int(41)]).unwrap(), Value::Int(42));
}

#[test]
fn test_redefinition_visible_in_global_diagnostics() {
    let class = counter("GlobalRedefined");
    let catalog = get_catalog(&class);
    let first = build_surrogate(&catalog, Variation::default().forward(|_, _, _| Ok(Value::Null)));
    let second = build_surrogate(&catalog, Variation::default().forward(|_, _, _| Ok(Value::Int(1))));
    assert_eq!(first, second);

    let context = global().lock();
    assert!(context.diagnostics().iter().any(|d| matches!(
        d,
        Diagnostic::Redefinition { origin, .. } if origin == "GlobalRedefined"
    )));
}

#[test]
fn test_unknown_surrogate_in_global_context() {
    let mut private = Entangler::new();
    let id: SurrogateId = private.entangle(&counter("PrivateOnly"), Variation::default());

    assert!(matches!(
        instantiate_surrogate(&id, Vec::<(String, Value)>::new()),
        Err(EngineError::UnknownSurrogate(_))
    ));
}

#[test]
fn test_concurrent_builds_realize_once() {
    let class = counter("GlobalRaced");
    let catalog = get_catalog(&class);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || build_surrogate(&catalog, Variation::new("raced")))
        })
        .collect();
    let ids: Vec<SurrogateId> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(ids.iter().all(|id| *id == ids[0]));
    assert_eq!(global().lock().surrogates().variations_of(class.id()), vec!["raced"]);
}
