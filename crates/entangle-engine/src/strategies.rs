//! Stock strategies
//!
//! Ready-made interception strategies for the common proxy shape: a
//! surrogate instance wrapping an original instance under an attribute,
//! with data slots mirroring the original class's storage.

use std::iter;
use std::sync::Arc;

use entangle_sdk::{
    CallError, CallResult, ClassRef, ForwardFn, HandlerFactory, MemberKind, ObjectRef,
    SlotAccess, SlotHandler, Value,
};

/// Attribute name [`delegate_to`] is conventionally pointed at
pub const WRAPPED_ATTRIBUTE: &str = "wrapped";

/// Forwarding strategy calling each member on the object held in `attr`.
///
/// Only instance calls can be delegated: a type-level call fails with
/// [`CallError::MissingInvocant`], an instance without the attribute with
/// [`CallError::MissingAttribute`]. Errors from the wrapped call pass
/// through unchanged.
pub fn delegate_to(attr: &str) -> ForwardFn {
    let attr = attr.to_string();
    Arc::new(
        move |instance: Option<&ObjectRef>, member: &str, args: &[Value]| -> CallResult<Value> {
            let instance = instance.ok_or_else(|| CallError::MissingInvocant(member.to_string()))?;
            match instance.attr(&attr) {
                Some(Value::Object(target)) => target.call(member, args),
                Some(other) => Err(CallError::mismatch("object", other.type_name())),
                None => Err(CallError::MissingAttribute(attr.clone())),
            }
        },
    )
}

/// Slot handler reading and writing the same slot on another class
pub struct MirrorHandler {
    target: ClassRef,
}

impl MirrorHandler {
    /// Mirror slots of `target`
    pub fn new(target: ClassRef) -> Self {
        Self { target }
    }

    /// Class whose slots are mirrored
    pub fn target(&self) -> &ClassRef {
        &self.target
    }
}

impl SlotHandler for MirrorHandler {
    fn fetch(&self, access: &SlotAccess<'_>) -> CallResult<Value> {
        self.target.fetch(access.kind, access.member, access.address)
    }

    fn store(&self, access: &SlotAccess<'_>, value: Value) -> CallResult<Value> {
        self.target.store(access.kind, access.member, access.address, value)
    }
}

/// Handler strategy making every bound slot a view of `origin`'s slot.
///
/// Each binding mirrors the class that declares the slot: `origin` itself,
/// or the first ancestor that has a slot of that name and kind.
pub fn mirror(origin: &ClassRef) -> HandlerFactory {
    let origin = Arc::clone(origin);
    HandlerFactory::new(move |binding| {
        let target = declaring_class(&origin, binding.member, binding.kind);
        let handler: Arc<dyn SlotHandler> = Arc::new(MirrorHandler::new(target));
        handler
    })
}

fn declaring_class(origin: &ClassRef, member: &str, kind: MemberKind) -> ClassRef {
    iter::once(Arc::clone(origin))
        .chain(origin.ancestors())
        .find(|class| class.member(member).is_some_and(|m| m.slot(kind).is_some()))
        .unwrap_or_else(|| Arc::clone(origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use entangle_sdk::{Class, Object, SlotBinding};

    fn greeter() -> ClassRef {
        Class::builder("Greeter")
            .method("greet", |args| {
                let name = args.get(1).and_then(Value::as_str).unwrap_or("nobody");
                Ok(Value::from(format!("hi, {}", name)))
            })
            .method("fail", |_| Err(CallError::Strategy("boom".into())))
            .build()
    }

    #[test]
    fn test_delegate_calls_wrapped() {
        let wrapped = Object::new(&greeter(), Vec::<(String, Value)>::new());
        let holder = Object::new(
            &Class::builder("Holder").build(),
            [(WRAPPED_ATTRIBUTE, Value::Object(wrapped))],
        );

        let forward = delegate_to(WRAPPED_ATTRIBUTE);
        let result = forward(Some(&holder), "greet", &[Value::from("a")]).unwrap();
        assert_eq!(result, Value::from("hi, a"));
    }

    #[test]
    fn test_delegate_requires_instance() {
        let forward = delegate_to(WRAPPED_ATTRIBUTE);
        assert_eq!(
            forward(None, "greet", &[]),
            Err(CallError::MissingInvocant("greet".into()))
        );
    }

    #[test]
    fn test_delegate_requires_attribute() {
        let holder = Object::new(&Class::builder("Holder").build(), [("other", Value::Int(1))]);
        let forward = delegate_to(WRAPPED_ATTRIBUTE);

        assert_eq!(
            forward(Some(&holder), "greet", &[]),
            Err(CallError::MissingAttribute(WRAPPED_ATTRIBUTE.into()))
        );
        holder.set_attr(WRAPPED_ATTRIBUTE, 3);
        assert!(matches!(
            forward(Some(&holder), "greet", &[]),
            Err(CallError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_delegate_propagates_errors() {
        let wrapped = Object::new(&greeter(), Vec::<(String, Value)>::new());
        let holder = Object::new(
            &Class::builder("Holder").build(),
            [(WRAPPED_ATTRIBUTE, Value::Object(wrapped))],
        );

        let forward = delegate_to(WRAPPED_ATTRIBUTE);
        assert_eq!(
            forward(Some(&holder), "fail", &[]),
            Err(CallError::Strategy("boom".into()))
        );
    }

    #[test]
    fn test_mirror_reads_and_writes_origin() {
        let origin = Class::builder("Counter").field("count", 0).build();
        let handler = mirror(&origin).bind(&SlotBinding {
            class: "S",
            member: "count",
            kind: MemberKind::Scalar,
        });
        let access = SlotAccess::whole("count", MemberKind::Scalar);

        assert_eq!(handler.fetch(&access).unwrap(), Value::Int(0));
        handler.store(&access, Value::Int(7)).unwrap();
        assert_eq!(origin.scalar("count").unwrap(), Value::Int(7));
    }

    #[test]
    fn test_mirror_finds_declaring_ancestor() {
        let base = Class::builder("Base").field("tags", vec![Value::from("a")]).build();
        let derived = Class::builder("Derived").parent(&base).build();

        let target = declaring_class(&derived, "tags", MemberKind::Sequence);
        assert!(Arc::ptr_eq(&target, &base));
        let fallback = declaring_class(&derived, "missing", MemberKind::Scalar);
        assert!(Arc::ptr_eq(&fallback, &derived));
    }
}
