//! Surrogate configurations

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use entangle_sdk::{
    CallResult, ForwardFn, HandlerFactory, HandlerRegistry, MemberKind, ObjectRef, Value,
};

/// Label used when a variation is not named
pub const DEFAULT_VARIATION: &str = "default";

/// A named bundle of interception strategies for one origin class.
///
/// ```ignore
/// let variation = Variation::new("audit")
///     .forward(|instance, member, args| { /* ... */ })
///     .scalar_handler(counter_strategy)
///     .type_name("AuditedGreeter");
/// ```
#[derive(Clone)]
pub struct Variation {
    label: String,
    forward: Option<ForwardFn>,
    handlers: BTreeMap<MemberKind, HandlerFactory>,
    named: BTreeMap<MemberKind, String>,
    type_name: Option<String>,
}

impl Variation {
    /// Empty variation with a label
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            forward: None,
            handlers: BTreeMap::new(),
            named: BTreeMap::new(),
            type_name: None,
        }
    }

    /// Set the forwarding strategy for invocable members
    pub fn forward(
        self,
        strategy: impl Fn(Option<&ObjectRef>, &str, &[Value]) -> CallResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.forward_with(Arc::new(strategy))
    }

    /// Set a shared forwarding strategy
    pub fn forward_with(mut self, strategy: ForwardFn) -> Self {
        self.forward = Some(strategy);
        self
    }

    /// Set the handler strategy for a data-slot kind
    pub fn handler(mut self, kind: MemberKind, factory: HandlerFactory) -> Self {
        debug_assert!(kind.is_data(), "invocable members use the forwarding strategy");
        if kind.is_data() {
            self.named.remove(&kind);
            self.handlers.insert(kind, factory);
        }
        self
    }

    /// Use the handler strategy registered under `name` for a data-slot kind.
    ///
    /// Names are looked up in the building context's
    /// [`HandlerRegistry`](entangle_sdk::HandlerRegistry) when the surrogate
    /// is built.
    pub fn named_handler(mut self, kind: MemberKind, name: &str) -> Self {
        debug_assert!(kind.is_data(), "invocable members use the forwarding strategy");
        if kind.is_data() {
            self.handlers.remove(&kind);
            self.named.insert(kind, name.to_string());
        }
        self
    }

    /// Set the scalar handler strategy
    pub fn scalar_handler(self, factory: HandlerFactory) -> Self {
        self.handler(MemberKind::Scalar, factory)
    }

    /// Set the sequence handler strategy
    pub fn sequence_handler(self, factory: HandlerFactory) -> Self {
        self.handler(MemberKind::Sequence, factory)
    }

    /// Set the mapping handler strategy
    pub fn mapping_handler(self, factory: HandlerFactory) -> Self {
        self.handler(MemberKind::Mapping, factory)
    }

    /// Set the stream handler strategy
    pub fn stream_handler(self, factory: HandlerFactory) -> Self {
        self.handler(MemberKind::Stream, factory)
    }

    /// Override the derived surrogate name
    pub fn type_name(mut self, name: &str) -> Self {
        self.type_name = Some(name.to_string());
        self
    }

    /// Variation label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Forwarding strategy, if set
    pub fn forwarding(&self) -> Option<&ForwardFn> {
        self.forward.as_ref()
    }

    /// Handler strategy for a kind, if set
    pub fn handler_for(&self, kind: MemberKind) -> Option<&HandlerFactory> {
        self.handlers.get(&kind)
    }

    /// Handler strategies still named rather than resolved
    pub fn named_handlers(&self) -> impl Iterator<Item = (MemberKind, &str)> + '_ {
        self.named.iter().map(|(kind, name)| (*kind, name.as_str()))
    }

    /// Replace every named handler with the registered strategy.
    ///
    /// Returns the `(kind, name)` pairs that are not registered; those kinds
    /// are left without a handler.
    pub fn resolve_named(&mut self, registry: &HandlerRegistry) -> Vec<(MemberKind, String)> {
        let mut missing = Vec::new();
        for (kind, name) in std::mem::take(&mut self.named) {
            match registry.get(&name) {
                Some(factory) => {
                    self.handlers.insert(kind, factory);
                }
                None => missing.push((kind, name)),
            }
        }
        missing
    }

    /// Explicit surrogate name, if set
    pub fn type_name_override(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Whether any strategy was supplied
    pub fn has_strategies(&self) -> bool {
        self.forward.is_some() || !self.handlers.is_empty() || !self.named.is_empty()
    }
}

impl Default for Variation {
    fn default() -> Self {
        Self::new(DEFAULT_VARIATION)
    }
}

impl fmt::Debug for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variation")
            .field("label", &self.label)
            .field("forward", &self.forward.is_some())
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("named", &self.named)
            .field("type_name", &self.type_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entangle_sdk::{FnSlotHandler, SlotHandler};

    fn null_factory() -> HandlerFactory {
        let handler: Arc<dyn SlotHandler> =
            Arc::new(FnSlotHandler::new(|_| Ok(Value::Null), |_, v| Ok(v)));
        HandlerFactory::shared(handler)
    }

    #[test]
    fn test_default_variation() {
        let variation = Variation::default();
        assert_eq!(variation.label(), DEFAULT_VARIATION);
        assert!(!variation.has_strategies());
        assert!(variation.type_name_override().is_none());
    }

    #[test]
    fn test_forward_counts_as_strategy() {
        let variation = Variation::new("v2").forward(|_, _, _| Ok(Value::Null));
        assert!(variation.has_strategies());
        assert!(variation.forwarding().is_some());
    }

    #[test]
    fn test_handlers_by_kind() {
        let variation = Variation::default()
            .scalar_handler(null_factory())
            .stream_handler(null_factory())
            .type_name("Custom");

        assert!(variation.has_strategies());
        assert!(variation.handler_for(MemberKind::Scalar).is_some());
        assert!(variation.handler_for(MemberKind::Stream).is_some());
        assert!(variation.handler_for(MemberKind::Mapping).is_none());
        assert_eq!(variation.type_name_override(), Some("Custom"));
    }

    #[test]
    fn test_named_handlers_resolve_through_registry() {
        let mut registry = HandlerRegistry::new();
        registry.register("null", null_factory());

        let mut variation = Variation::default()
            .named_handler(MemberKind::Scalar, "null")
            .named_handler(MemberKind::Mapping, "absent");
        assert!(variation.has_strategies());
        assert_eq!(variation.named_handlers().count(), 2);

        let missing = variation.resolve_named(&registry);
        assert_eq!(missing, vec![(MemberKind::Mapping, "absent".to_string())]);
        assert!(variation.handler_for(MemberKind::Scalar).is_some());
        assert!(variation.handler_for(MemberKind::Mapping).is_none());
        assert_eq!(variation.named_handlers().count(), 0);
    }

    #[test]
    fn test_latest_handler_choice_wins() {
        let variation = Variation::default()
            .named_handler(MemberKind::Scalar, "null")
            .scalar_handler(null_factory());
        assert_eq!(variation.named_handlers().count(), 0);
        assert!(variation.handler_for(MemberKind::Scalar).is_some());

        let variation = variation.named_handler(MemberKind::Scalar, "null");
        assert!(variation.handler_for(MemberKind::Scalar).is_none());
        assert_eq!(variation.named_handlers().collect::<Vec<_>>(), vec![(MemberKind::Scalar, "null")]);
    }
}
