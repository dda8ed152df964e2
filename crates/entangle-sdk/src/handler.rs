//! Collaborator contracts: methods, forwarding strategies and slot handlers
//!
//! Origin types and handler strategies are written against these types
//! alone; the engine only wires them together.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::CallResult;
use crate::kind::MemberKind;
use crate::object::ObjectRef;
use crate::value::Value;

/// A method body. When invoked as a method `args[0]` is the invocant.
pub type MethodFn = Arc<dyn Fn(&[Value]) -> CallResult<Value> + Send + Sync>;

/// Forwarding strategy: `(instance_or_none, member_name, args) -> result`
pub type ForwardFn =
    Arc<dyn Fn(Option<&ObjectRef>, &str, &[Value]) -> CallResult<Value> + Send + Sync>;

// ============================================================================
// Slot access
// ============================================================================

/// Which part of a slot an access touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAddress<'a> {
    /// The whole slot (scalar value, full list or map, next stream line)
    Whole,
    /// One element of a sequence
    Index(usize),
    /// One entry of a mapping
    Key(&'a str),
}

/// Context passed to a handler on every read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAccess<'a> {
    /// Name of the data member being accessed
    pub member: &'a str,
    /// Kind of the slot
    pub kind: MemberKind,
    /// Addressed part of the slot
    pub address: SlotAddress<'a>,
}

impl<'a> SlotAccess<'a> {
    /// Access to a whole slot
    pub fn whole(member: &'a str, kind: MemberKind) -> Self {
        Self {
            member,
            kind,
            address: SlotAddress::Whole,
        }
    }
}

/// Redirected storage behind a data slot.
///
/// Every read of a tied slot calls `fetch`, every write calls `store`.
/// Errors are returned to the accessing caller unchanged.
pub trait SlotHandler: Send + Sync {
    /// Produce the current value for an access
    fn fetch(&self, access: &SlotAccess<'_>) -> CallResult<Value>;

    /// Accept a written value; returns the value as stored
    fn store(&self, access: &SlotAccess<'_>, value: Value) -> CallResult<Value>;
}

type FetchFn = dyn Fn(&SlotAccess<'_>) -> CallResult<Value> + Send + Sync;
type StoreFn = dyn Fn(&SlotAccess<'_>, Value) -> CallResult<Value> + Send + Sync;

/// A slot handler made from a pair of closures
pub struct FnSlotHandler {
    fetch: Box<FetchFn>,
    store: Box<StoreFn>,
}

impl FnSlotHandler {
    /// Build from fetch and store closures
    pub fn new(
        fetch: impl Fn(&SlotAccess<'_>) -> CallResult<Value> + Send + Sync + 'static,
        store: impl Fn(&SlotAccess<'_>, Value) -> CallResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            fetch: Box::new(fetch),
            store: Box::new(store),
        }
    }
}

impl SlotHandler for FnSlotHandler {
    fn fetch(&self, access: &SlotAccess<'_>) -> CallResult<Value> {
        (self.fetch)(access)
    }

    fn store(&self, access: &SlotAccess<'_>, value: Value) -> CallResult<Value> {
        (self.store)(access, value)
    }
}

// ============================================================================
// Handler strategies
// ============================================================================

/// The slot a handler is being bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBinding<'a> {
    /// Name of the class receiving the slot
    pub class: &'a str,
    /// Data member name
    pub member: &'a str,
    /// Slot kind
    pub kind: MemberKind,
}

type BindFn = dyn Fn(&SlotBinding<'_>) -> Arc<dyn SlotHandler> + Send + Sync;

/// Reusable handler strategy.
///
/// Binding a slot asks the strategy for the handler that will front it,
/// so a strategy may keep per-slot state or share one handler everywhere.
#[derive(Clone)]
pub struct HandlerFactory(Arc<BindFn>);

impl HandlerFactory {
    /// Strategy that mints a handler per binding
    pub fn new(
        bind: impl Fn(&SlotBinding<'_>) -> Arc<dyn SlotHandler> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(bind))
    }

    /// Strategy that fronts every slot with the same handler
    pub fn shared(handler: Arc<dyn SlotHandler>) -> Self {
        Self::new(move |_| Arc::clone(&handler))
    }

    /// Obtain the handler for a slot
    pub fn bind(&self, binding: &SlotBinding<'_>) -> Arc<dyn SlotHandler> {
        (self.0)(binding)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &HandlerFactory) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HandlerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFactory").finish_non_exhaustive()
    }
}

/// Registry of handler strategies indexed by name.
///
/// Strategies live independently of any one surrogate and are looked up
/// by name when a variation is configured.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy under a name, replacing any previous one
    pub fn register(&mut self, name: &str, factory: HandlerFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Get a strategy by name
    pub fn get(&self, name: &str) -> Option<HandlerFactory> {
        self.factories.get(name).cloned()
    }

    /// Check if a strategy is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered strategies
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
