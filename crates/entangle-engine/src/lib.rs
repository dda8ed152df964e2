//! Entangle Engine
//!
//! Builds transparent surrogate types for existing classes in three stages:
//!
//! 1. **Catalog**: reflect a class and its ancestors into a
//!    [`MemberCatalog`], cached per class for the life of the process
//! 2. **Synthesize**: replay the catalog through a [`Variation`] into a new
//!    surrogate class, realized at most once per (origin, variation)
//! 3. **Instantiate**: create surrogate instances holding caller state
//!
//! Every surrogate method forwards to the variation's forwarding strategy and
//! every surrogate data slot is fronted by a [`SlotHandler`](entangle_sdk::SlotHandler).
//!
//! # Example
//!
//! ```ignore
//! use entangle_engine::{strategies, Entangler, Variation};
//! use entangle_sdk::{Object, Value};
//!
//! let mut entangler = Entangler::new();
//! let catalog = entangler.catalog(&greeter);
//! let id = entangler.build_surrogate(
//!     &catalog,
//!     Variation::default().forward_with(strategies::delegate_to("wrapped")),
//! );
//!
//! let original = Object::new(&greeter, Vec::<(String, Value)>::new());
//! let proxy = entangler.instantiate(&id, [("wrapped", Value::Object(original))])?;
//! proxy.call("greet", &["a".into()])?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod catalog;
pub mod diagnostics;
pub mod entangler;
pub mod error;
pub mod options;
pub mod strategies;
pub mod surrogate;

pub use catalog::{CatalogCache, MemberCatalog};
pub use diagnostics::{Diagnostic, DiagnosticLog};
pub use entangler::{build_surrogate, get_catalog, global, instantiate_surrogate, Entangler};
pub use error::{EngineError, EngineResult};
pub use options::{EntanglerOptions, DEFAULT_SURROGATE_INFIX, RESERVED_MEMBERS};
pub use surrogate::{
    NameOwner, SurrogateId, SurrogateKey, SurrogateRegistry, Variation, DEFAULT_VARIATION,
};
