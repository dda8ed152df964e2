//! Object model: classes with declarative member tables, and their instances
//!
//! A class is a symbol table. Each entry is glob-like: one name can carry a
//! method and any number of data slots at once (a scalar and a stream, say).
//! Data slots live on the class, not on instances, and are either native
//! storage or tied to a [`SlotHandler`].

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{CallError, CallResult};
use crate::handler::{MethodFn, SlotAccess, SlotAddress, SlotHandler};
use crate::kind::MemberKind;
use crate::value::{Value, ValueMap};

/// Global counter for class identities
static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique class identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassId(u64);

impl ClassId {
    /// Allocate a fresh identity
    pub fn next() -> Self {
        ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric identity
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Members
// ============================================================================

/// Storage behind one data slot
#[derive(Clone)]
pub enum Slot {
    /// Native storage
    Plain(Value),
    /// Redirected through a handler
    Tied(Arc<dyn SlotHandler>),
}

impl Slot {
    /// Whether the slot is handler-backed
    pub fn is_tied(&self) -> bool {
        matches!(self, Slot::Tied(_))
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Plain(v) => f.debug_tuple("Plain").field(v).finish(),
            Slot::Tied(_) => f.write_str("Tied(..)"),
        }
    }
}

/// One symbol-table entry
#[derive(Clone, Default)]
pub struct Member {
    method: Option<MethodFn>,
    slots: BTreeMap<MemberKind, Slot>,
}

impl Member {
    /// Method body, if callable
    pub fn method(&self) -> Option<&MethodFn> {
        self.method.as_ref()
    }

    /// Data slot of a kind
    pub fn slot(&self, kind: MemberKind) -> Option<&Slot> {
        self.slots.get(&kind)
    }

    /// Every kind this entry currently answers to
    pub fn kinds(&self) -> Vec<MemberKind> {
        let mut kinds = Vec::with_capacity(self.slots.len() + 1);
        if self.method.is_some() {
            kinds.push(MemberKind::Invocable);
        }
        kinds.extend(self.slots.keys().copied());
        kinds
    }

    /// No method and no slots
    pub fn is_empty(&self) -> bool {
        self.method.is_none() && self.slots.is_empty()
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("method", &self.method.is_some())
            .field("slots", &self.slots)
            .finish()
    }
}

// ============================================================================
// Class
// ============================================================================

/// Shared class handle
pub type ClassRef = Arc<Class>;

/// A type descriptor with a live, mutable member table
pub struct Class {
    id: ClassId,
    name: String,
    parents: RwLock<Vec<ClassRef>>,
    members: RwLock<BTreeMap<String, Member>>,
}

impl Class {
    /// Start building a class
    pub fn builder(name: &str) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    /// Class identity
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct parents, in declaration order
    pub fn parents(&self) -> Vec<ClassRef> {
        self.parents.read().clone()
    }

    /// Append a parent
    pub fn add_parent(&self, parent: &ClassRef) {
        self.parents.write().push(Arc::clone(parent));
    }

    /// Every ancestor, depth-first and left-to-right, each visited once
    pub fn ancestors(&self) -> Vec<ClassRef> {
        let mut seen = FxHashSet::default();
        seen.insert(self.id);
        let mut out = Vec::new();
        let mut stack: Vec<ClassRef> = self.parents().into_iter().rev().collect();
        while let Some(class) = stack.pop() {
            if !seen.insert(class.id) {
                continue;
            }
            stack.extend(class.parents().into_iter().rev());
            out.push(class);
        }
        out
    }

    /// Whether this class is, or inherits from, `id`
    pub fn isa(&self, id: ClassId) -> bool {
        self.id == id || self.ancestors().iter().any(|c| c.id == id)
    }

    /// Snapshot of the declared member table
    pub fn members(&self) -> BTreeMap<String, Member> {
        self.members.read().clone()
    }

    /// Snapshot of one declared member
    pub fn member(&self, name: &str) -> Option<Member> {
        self.members.read().get(name).cloned()
    }

    /// Declared member names, sorted
    pub fn member_names(&self) -> Vec<String> {
        self.members.read().keys().cloned().collect()
    }

    /// Define or replace a method
    pub fn define_method(
        &self,
        name: &str,
        body: impl Fn(&[Value]) -> CallResult<Value> + Send + Sync + 'static,
    ) {
        self.define_method_fn(name, Arc::new(body));
    }

    /// Define or replace a method from a shared body
    pub fn define_method_fn(&self, name: &str, body: MethodFn) {
        self.members.write().entry(name.to_string()).or_default().method = Some(body);
    }

    /// Assign a value into the slot matching its shape
    pub fn assign(&self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        let kind = MemberKind::of_value(&value);
        self.set_slot(name, kind, Slot::Plain(value));
    }

    /// Install a slot of an explicit kind
    pub fn set_slot(&self, name: &str, kind: MemberKind, slot: Slot) {
        debug_assert!(kind.is_data(), "slots hold data kinds only");
        self.members.write().entry(name.to_string()).or_default().slots.insert(kind, slot);
    }

    /// Remove a whole entry
    pub fn remove_member(&self, name: &str) -> Option<Member> {
        self.members.write().remove(name)
    }

    /// Find a method on this class or its ancestors
    pub fn resolve_method(&self, name: &str) -> Option<MethodFn> {
        if let Some(body) = self.members.read().get(name).and_then(|m| m.method.clone()) {
            return Some(body);
        }
        self.ancestors()
            .iter()
            .find_map(|c| c.members.read().get(name).and_then(|m| m.method.clone()))
    }

    /// Call a method without an invocant
    pub fn call_static(&self, name: &str, args: &[Value]) -> CallResult<Value> {
        let body = self.resolve_method(name).ok_or_else(|| CallError::MethodNotFound {
            class: self.name.clone(),
            method: name.to_string(),
        })?;
        body(args)
    }

    fn slot_of(&self, kind: MemberKind, name: &str) -> CallResult<Slot> {
        self.members
            .read()
            .get(name)
            .and_then(|m| m.slots.get(&kind).cloned())
            .ok_or_else(|| CallError::SlotNotFound {
                class: self.name.clone(),
                member: name.to_string(),
                kind,
            })
    }

    /// Read part of a data slot
    pub fn fetch(&self, kind: MemberKind, name: &str, address: SlotAddress<'_>) -> CallResult<Value> {
        match self.slot_of(kind, name)? {
            Slot::Tied(handler) => handler.fetch(&SlotAccess { member: name, kind, address }),
            Slot::Plain(value) => plain_fetch(kind, &value, address),
        }
    }

    /// Write part of a data slot; returns the stored value
    pub fn store(
        &self,
        kind: MemberKind,
        name: &str,
        address: SlotAddress<'_>,
        value: Value,
    ) -> CallResult<Value> {
        // Handlers run outside the member lock; they may touch the class again.
        let handler = {
            let mut members = self.members.write();
            let slot = members
                .get_mut(name)
                .and_then(|m| m.slots.get_mut(&kind))
                .ok_or_else(|| CallError::SlotNotFound {
                    class: self.name.clone(),
                    member: name.to_string(),
                    kind,
                })?;
            match slot {
                Slot::Plain(current) => return plain_store(kind, current, address, value),
                Slot::Tied(handler) => Arc::clone(handler),
            }
        };
        handler.store(&SlotAccess { member: name, kind, address }, value)
    }

    /// Read a scalar slot
    pub fn scalar(&self, name: &str) -> CallResult<Value> {
        self.fetch(MemberKind::Scalar, name, SlotAddress::Whole)
    }

    /// Write a scalar slot
    pub fn set_scalar(&self, name: &str, value: impl Into<Value>) -> CallResult<Value> {
        self.store(MemberKind::Scalar, name, SlotAddress::Whole, value.into())
    }

    /// Read a whole sequence slot
    pub fn sequence(&self, name: &str) -> CallResult<Vec<Value>> {
        match self.fetch(MemberKind::Sequence, name, SlotAddress::Whole)? {
            Value::List(items) => Ok(items),
            other => Err(CallError::mismatch("list", other.type_name())),
        }
    }

    /// Read one element of a sequence slot
    pub fn element(&self, name: &str, index: usize) -> CallResult<Value> {
        self.fetch(MemberKind::Sequence, name, SlotAddress::Index(index))
    }

    /// Write one element of a sequence slot
    pub fn set_element(&self, name: &str, index: usize, value: impl Into<Value>) -> CallResult<Value> {
        self.store(MemberKind::Sequence, name, SlotAddress::Index(index), value.into())
    }

    /// Append to a sequence slot
    pub fn push_element(&self, name: &str, value: impl Into<Value>) -> CallResult<Value> {
        let len = self.sequence(name)?.len();
        self.set_element(name, len, value)
    }

    /// Read a whole mapping slot
    pub fn mapping(&self, name: &str) -> CallResult<ValueMap> {
        match self.fetch(MemberKind::Mapping, name, SlotAddress::Whole)? {
            Value::Map(map) => Ok(map),
            other => Err(CallError::mismatch("map", other.type_name())),
        }
    }

    /// Read one entry of a mapping slot
    pub fn entry(&self, name: &str, key: &str) -> CallResult<Value> {
        self.fetch(MemberKind::Mapping, name, SlotAddress::Key(key))
    }

    /// Write one entry of a mapping slot
    pub fn set_entry(&self, name: &str, key: &str, value: impl Into<Value>) -> CallResult<Value> {
        self.store(MemberKind::Mapping, name, SlotAddress::Key(key), value.into())
    }

    /// Read the next line from a stream slot (`Null` at end of input)
    pub fn read_stream(&self, name: &str) -> CallResult<Value> {
        self.fetch(MemberKind::Stream, name, SlotAddress::Whole)
    }

    /// Write a line to a stream slot
    pub fn write_stream(&self, name: &str, value: impl Into<Value>) -> CallResult<Value> {
        self.store(MemberKind::Stream, name, SlotAddress::Whole, value.into())
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parents: Vec<String> = self.parents.read().iter().map(|p| p.name.clone()).collect();
        f.debug_struct("Class")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parents", &parents)
            .field("members", &self.member_names())
            .finish()
    }
}

fn plain_fetch(kind: MemberKind, value: &Value, address: SlotAddress<'_>) -> CallResult<Value> {
    match (address, value) {
        (SlotAddress::Whole, Value::Stream(stream)) if kind == MemberKind::Stream => {
            Ok(stream.read_line().map(Value::Str).unwrap_or(Value::Null))
        }
        (SlotAddress::Whole, v) => Ok(v.clone()),
        (SlotAddress::Index(i), Value::List(items)) => Ok(items.get(i).cloned().unwrap_or(Value::Null)),
        (SlotAddress::Key(k), Value::Map(map)) => Ok(map.get(k).cloned().unwrap_or(Value::Null)),
        (SlotAddress::Index(_), other) => Err(CallError::mismatch("list", other.type_name())),
        (SlotAddress::Key(_), other) => Err(CallError::mismatch("map", other.type_name())),
    }
}

fn plain_store(
    kind: MemberKind,
    current: &mut Value,
    address: SlotAddress<'_>,
    value: Value,
) -> CallResult<Value> {
    match (address, current) {
        (SlotAddress::Whole, Value::Stream(stream))
            if kind == MemberKind::Stream && !matches!(value, Value::Stream(_)) =>
        {
            stream.write(value.to_string());
            Ok(value)
        }
        (SlotAddress::Whole, current) => {
            let expected = match kind {
                MemberKind::Sequence => Some("list"),
                MemberKind::Mapping => Some("map"),
                MemberKind::Stream => Some("stream"),
                _ => None,
            };
            if let Some(expected) = expected {
                if MemberKind::of_value(&value) != kind {
                    return Err(CallError::mismatch(expected, value.type_name()));
                }
            }
            *current = value.clone();
            Ok(value)
        }
        (SlotAddress::Index(i), Value::List(items)) => {
            if i >= items.len() {
                let len = i.checked_add(1).ok_or(CallError::IndexOutOfRange(i))?;
                items.try_reserve(len - items.len()).map_err(|_| CallError::IndexOutOfRange(i))?;
                items.resize(len, Value::Null);
            }
            items[i] = value.clone();
            Ok(value)
        }
        (SlotAddress::Key(k), Value::Map(map)) => {
            map.insert(k.to_string(), value.clone());
            Ok(value)
        }
        (SlotAddress::Index(_), other) => Err(CallError::mismatch("list", other.type_name())),
        (SlotAddress::Key(_), other) => Err(CallError::mismatch("map", other.type_name())),
    }
}

// ============================================================================
// ClassBuilder
// ============================================================================

/// Builder for a class's initial member table.
///
/// The identity is allocated when the builder is created, so members
/// generated during building can already refer to it.
pub struct ClassBuilder {
    id: ClassId,
    name: String,
    parents: Vec<ClassRef>,
    members: BTreeMap<String, Member>,
}

impl ClassBuilder {
    /// Create a new builder
    pub fn new(name: &str) -> Self {
        Self {
            id: ClassId::next(),
            name: name.to_string(),
            parents: Vec::new(),
            members: BTreeMap::new(),
        }
    }

    /// Identity the built class will carry
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Add a parent class
    pub fn parent(mut self, parent: &ClassRef) -> Self {
        self.parents.push(Arc::clone(parent));
        self
    }

    /// Add a method
    pub fn method(
        self,
        name: &str,
        body: impl Fn(&[Value]) -> CallResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.method_fn(name, Arc::new(body))
    }

    /// Add a method from a shared body
    pub fn method_fn(mut self, name: &str, body: MethodFn) -> Self {
        self.members.entry(name.to_string()).or_default().method = Some(body);
        self
    }

    /// Add a data member, placed by the shape of its value
    pub fn field(self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        let kind = MemberKind::of_value(&value);
        self.slot(name, kind, Slot::Plain(value))
    }

    /// Add a data slot of an explicit kind
    pub fn slot(mut self, name: &str, kind: MemberKind, slot: Slot) -> Self {
        debug_assert!(kind.is_data(), "slots hold data kinds only");
        self.members.entry(name.to_string()).or_default().slots.insert(kind, slot);
        self
    }

    /// Add a handler-backed data slot
    pub fn tie(self, name: &str, kind: MemberKind, handler: Arc<dyn SlotHandler>) -> Self {
        self.slot(name, kind, Slot::Tied(handler))
    }

    /// Number of entries declared so far
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Finish the class
    pub fn build(self) -> ClassRef {
        Arc::new(Class {
            id: self.id,
            name: self.name,
            parents: RwLock::new(self.parents),
            members: RwLock::new(self.members),
        })
    }
}

// ============================================================================
// Object
// ============================================================================

/// An instance: a class plus free-form attributes
pub struct Object {
    class: ClassRef,
    attributes: RwLock<FxHashMap<String, Value>>,
}

/// Shared, identity-compared object handle
#[derive(Clone)]
pub struct ObjectRef(Arc<Object>);

impl Object {
    /// Create an instance with initial attributes
    pub fn new<K: Into<String>>(
        class: &ClassRef,
        attributes: impl IntoIterator<Item = (K, Value)>,
    ) -> ObjectRef {
        let attributes = attributes.into_iter().map(|(k, v)| (k.into(), v)).collect();
        ObjectRef(Arc::new(Object {
            class: Arc::clone(class),
            attributes: RwLock::new(attributes),
        }))
    }

    /// The instance's class
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// Whether the instance's class is, or inherits from, `id`
    pub fn isa(&self, id: ClassId) -> bool {
        self.class.isa(id)
    }

    /// Read an attribute
    pub fn attr(&self, name: &str) -> Option<Value> {
        self.attributes.read().get(name).cloned()
    }

    /// Write an attribute; returns the previous value
    pub fn set_attr(&self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.attributes.write().insert(name.to_string(), value.into())
    }

    /// Attribute names, sorted
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.attributes.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Read a scalar slot of the class
    pub fn scalar(&self, name: &str) -> CallResult<Value> {
        self.class.scalar(name)
    }

    /// Write a scalar slot of the class
    pub fn set_scalar(&self, name: &str, value: impl Into<Value>) -> CallResult<Value> {
        self.class.set_scalar(name, value)
    }

    /// Read a whole sequence slot of the class
    pub fn sequence(&self, name: &str) -> CallResult<Vec<Value>> {
        self.class.sequence(name)
    }

    /// Read one element of a sequence slot of the class
    pub fn element(&self, name: &str, index: usize) -> CallResult<Value> {
        self.class.element(name, index)
    }

    /// Write one element of a sequence slot of the class
    pub fn set_element(&self, name: &str, index: usize, value: impl Into<Value>) -> CallResult<Value> {
        self.class.set_element(name, index, value)
    }

    /// Read a whole mapping slot of the class
    pub fn mapping(&self, name: &str) -> CallResult<ValueMap> {
        self.class.mapping(name)
    }

    /// Read one entry of a mapping slot of the class
    pub fn entry(&self, name: &str, key: &str) -> CallResult<Value> {
        self.class.entry(name, key)
    }

    /// Write one entry of a mapping slot of the class
    pub fn set_entry(&self, name: &str, key: &str, value: impl Into<Value>) -> CallResult<Value> {
        self.class.set_entry(name, key, value)
    }

    /// Read a line from a stream slot of the class
    pub fn read_stream(&self, name: &str) -> CallResult<Value> {
        self.class.read_stream(name)
    }

    /// Write a line to a stream slot of the class
    pub fn write_stream(&self, name: &str, value: impl Into<Value>) -> CallResult<Value> {
        self.class.write_stream(name, value)
    }
}

impl ObjectRef {
    /// Call a method with this object as the invocant
    pub fn call(&self, method: &str, args: &[Value]) -> CallResult<Value> {
        let body = self.class.resolve_method(method).ok_or_else(|| CallError::MethodNotFound {
            class: self.class.name().to_string(),
            method: method.to_string(),
        })?;
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(Value::Object(self.clone()));
        argv.extend_from_slice(args);
        body(&argv)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ObjectRef {
    type Target = Object;

    fn deref(&self) -> &Object {
        &self.0
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Attribute values can point back at this object
        f.debug_struct("Object")
            .field("class", &self.class.name())
            .field("attributes", &self.attribute_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::StreamHandle;

    fn greeter() -> ClassRef {
        Class::builder("Greeter")
            .method("greet", |args| {
                let name = args.get(1).and_then(Value::as_str).unwrap_or("nobody");
                Ok(Value::Str(format!("hi, {}", name)))
            })
            .field("count", 0)
            .build()
    }

    #[test]
    fn test_builder_members() {
        let class = greeter();
        assert_eq!(class.name(), "Greeter");
        assert_eq!(class.member_names(), vec!["count".to_string(), "greet".to_string()]);
        assert_eq!(class.member("greet").unwrap().kinds(), vec![MemberKind::Invocable]);
        assert_eq!(class.member("count").unwrap().kinds(), vec![MemberKind::Scalar]);
    }

    #[test]
    fn test_field_placed_by_shape() {
        let class = Class::builder("Shapes")
            .field("tags", vec![Value::from("a")])
            .field("index", ValueMap::new())
            .field("log", StreamHandle::new("log"))
            .build();
        assert_eq!(class.member("tags").unwrap().kinds(), vec![MemberKind::Sequence]);
        assert_eq!(class.member("index").unwrap().kinds(), vec![MemberKind::Mapping]);
        assert_eq!(class.member("log").unwrap().kinds(), vec![MemberKind::Stream]);
    }

    #[test]
    fn test_polymorphic_member() {
        let class = Class::builder("Poly")
            .field("out", 1)
            .slot("out", MemberKind::Stream, Slot::Plain(Value::Stream(StreamHandle::new("out"))))
            .build();
        assert_eq!(
            class.member("out").unwrap().kinds(),
            vec![MemberKind::Scalar, MemberKind::Stream]
        );
    }

    #[test]
    fn test_object_call_passes_invocant() {
        let class = greeter();
        let obj = Object::new(&class, [("name", Value::from("t"))]);
        assert_eq!(obj.call("greet", &[Value::from("a")]).unwrap(), Value::from("hi, a"));

        let err = obj.call("missing", &[]).unwrap_err();
        assert!(matches!(err, CallError::MethodNotFound { .. }));
    }

    #[test]
    fn test_inherited_method_resolution() {
        let base = greeter();
        let child = Class::builder("Child").parent(&base).build();
        let obj = Object::new(&child, Vec::<(String, Value)>::new());

        assert_eq!(obj.call("greet", &[Value::from("b")]).unwrap(), Value::from("hi, b"));
        assert!(child.isa(base.id()));
        assert!(!base.isa(child.id()));
    }

    #[test]
    fn test_ancestors_diamond_and_cycle() {
        let root = Class::builder("Root").build();
        let left = Class::builder("Left").parent(&root).build();
        let right = Class::builder("Right").parent(&root).build();
        let leaf = Class::builder("Leaf").parent(&left).parent(&right).build();
        root.add_parent(&leaf);

        let names: Vec<String> = leaf.ancestors().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["Left", "Root", "Right"]);
    }

    #[test]
    fn test_plain_scalar_slot() {
        let class = greeter();
        assert_eq!(class.scalar("count").unwrap(), Value::Int(0));
        class.set_scalar("count", 3).unwrap();
        assert_eq!(class.scalar("count").unwrap(), Value::Int(3));

        let err = class.scalar("missing").unwrap_err();
        assert!(matches!(err, CallError::SlotNotFound { kind: MemberKind::Scalar, .. }));
    }

    #[test]
    fn test_plain_sequence_slot() {
        let class = Class::builder("Seq").field("items", vec![Value::Int(1)]).build();
        class.push_element("items", 2).unwrap();
        class.set_element("items", 4, 5).unwrap();

        assert_eq!(
            class.sequence("items").unwrap(),
            vec![Value::Int(1), Value::Int(2), Value::Null, Value::Null, Value::Int(5)]
        );
        assert_eq!(class.element("items", 9).unwrap(), Value::Null);
        assert!(class.set_scalar("items", 1).is_err());
        assert!(class
            .store(MemberKind::Sequence, "items", SlotAddress::Whole, Value::Int(1))
            .is_err());
    }

    #[test]
    fn test_unaddressable_index_keeps_sequence() {
        let class = Class::builder("Seq").field("items", vec![Value::Int(1)]).build();

        assert_eq!(
            class.set_element("items", usize::MAX, 2),
            Err(CallError::IndexOutOfRange(usize::MAX))
        );
        assert_eq!(
            class.set_element("items", usize::MAX - 1, 2),
            Err(CallError::IndexOutOfRange(usize::MAX - 1))
        );
        assert_eq!(class.sequence("items").unwrap(), vec![Value::Int(1)]);
    }

    #[test]
    fn test_plain_mapping_slot() {
        let class = Class::builder("Map").field("env", ValueMap::new()).build();
        class.set_entry("env", "HOME", "/root").unwrap();
        assert_eq!(class.entry("env", "HOME").unwrap(), Value::from("/root"));
        assert_eq!(class.entry("env", "PATH").unwrap(), Value::Null);
        assert_eq!(class.mapping("env").unwrap().len(), 1);
    }

    #[test]
    fn test_plain_stream_slot() {
        let stream = StreamHandle::new("io");
        stream.push_input("first");
        let class = Class::builder("Io").field("io", stream.clone()).build();

        assert_eq!(class.read_stream("io").unwrap(), Value::from("first"));
        assert_eq!(class.read_stream("io").unwrap(), Value::Null);
        class.write_stream("io", "out").unwrap();
        assert_eq!(stream.written(), vec!["out".to_string()]);
    }

    #[test]
    fn test_live_mutation() {
        let class = greeter();
        class.define_method("wave", |_| Ok(Value::from("o/")));
        class.assign("names", vec![Value::from("x")]);
        class.remove_member("count");

        assert!(class.resolve_method("wave").is_some());
        assert_eq!(class.member("names").unwrap().kinds(), vec![MemberKind::Sequence]);
        assert!(class.member("count").is_none());
    }

    #[test]
    fn test_object_attributes() {
        let class = greeter();
        let obj = Object::new(&class, [("a", Value::Int(1))]);
        assert_eq!(obj.attr("a"), Some(Value::Int(1)));
        assert_eq!(obj.set_attr("b", 2), None);
        assert_eq!(obj.attribute_names(), vec!["a".to_string(), "b".to_string()]);
        assert!(obj.ptr_eq(&obj.clone()));
        assert!(obj.isa(class.id()));
    }
}
