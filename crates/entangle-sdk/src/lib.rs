//! Entangle SDK - object model and collaborator contracts
//!
//! This crate provides the types needed to describe an origin type and to
//! write interception strategies without depending on the engine:
//!
//! - [`Class`] / [`ClassBuilder`]: declarative member tables (methods and
//!   data slots) with single or multiple inheritance
//! - [`Object`]: instances holding free-form attributes
//! - [`Value`]: the dynamic values passed through calls and slots
//! - [`ForwardFn`], [`SlotHandler`], [`HandlerFactory`]: the strategy
//!   contracts a surrogate type is wired to
//!
//! # Example
//!
//! ```ignore
//! use entangle_sdk::{Class, Object, Value};
//!
//! let greeter = Class::builder("Greeter")
//!     .method("greet", |args| {
//!         let name = args.get(1).and_then(Value::as_str).unwrap_or("");
//!         Ok(Value::Str(format!("hi, {}", name)))
//!     })
//!     .field("count", 0)
//!     .build();
//!
//! let g = Object::new(&greeter, Vec::<(String, Value)>::new());
//! assert_eq!(g.call("greet", &["a".into()])?, Value::from("hi, a"));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod handler;
pub mod kind;
pub mod object;
pub mod value;

pub use error::{CallError, CallResult};
pub use handler::{
    FnSlotHandler, ForwardFn, HandlerFactory, HandlerRegistry, MethodFn, SlotAccess, SlotAddress,
    SlotBinding, SlotHandler,
};
pub use kind::MemberKind;
pub use object::{Class, ClassBuilder, ClassId, ClassRef, Member, Object, ObjectRef, Slot};
pub use value::{StreamHandle, Value, ValueMap};
