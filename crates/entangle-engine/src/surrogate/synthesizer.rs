//! Surrogate class generation
//!
//! Replays a [`MemberCatalog`] through a [`Variation`]:
//!
//! | Catalog entry                     | Generated member                         |
//! |-----------------------------------|------------------------------------------|
//! | `Invocable` name                  | trampoline into the forwarding strategy  |
//! | data name, kind has a handler     | slot tied to a handler from the strategy |
//! | data name, kind has no handler    | nothing                                  |

use std::sync::Arc;

use entangle_sdk::{
    ClassBuilder, ClassId, ClassRef, ForwardFn, MemberKind, MethodFn, SlotBinding, Value,
};

use super::Variation;
use crate::catalog::MemberCatalog;

/// Deterministic surrogate name for an (origin, variation) pair.
///
/// The origin's identity is part of the name, so distinct classes sharing
/// a name never share a surrogate: `Node#3$Surrogate$default`.
pub fn surrogate_name(origin: &str, origin_id: ClassId, infix: &str, variation: &str) -> String {
    format!("{}{}{}{}", origin, origin_id, infix, variation)
}

/// Generate a surrogate class named `name` from a catalog and a variation
pub fn synthesize(name: &str, catalog: &MemberCatalog, variation: &Variation) -> ClassRef {
    let mut builder = ClassBuilder::new(name);
    let id = builder.id();

    if let Some(forward) = variation.forwarding() {
        for member in catalog.names(MemberKind::Invocable) {
            builder = builder.method_fn(member, trampoline(id, member, Arc::clone(forward)));
        }
    }

    for kind in MemberKind::DATA {
        let Some(factory) = variation.handler_for(kind) else {
            continue;
        };
        for member in catalog.names(kind) {
            let handler = factory.bind(&SlotBinding { class: name, member, kind });
            builder = builder.tie(member, kind, handler);
        }
    }

    tracing::debug!(
        surrogate = name,
        origin = catalog.origin_name(),
        variation = variation.label(),
        members = builder.member_count(),
        "synthesized surrogate"
    );
    builder.build()
}

/// Method body that hands every call to the forwarding strategy.
///
/// A leading argument that is an instance of the surrogate is taken off
/// the argument list and passed as the instance; otherwise the call is
/// treated as type-level and all arguments pass through.
fn trampoline(surrogate: ClassId, member: &str, forward: ForwardFn) -> MethodFn {
    let member = member.to_string();
    Arc::new(move |args: &[Value]| match args.split_first() {
        Some((Value::Object(instance), rest)) if instance.isa(surrogate) => {
            forward(Some(instance), &member, rest)
        }
        _ => forward(None, &member, args),
    })
}
