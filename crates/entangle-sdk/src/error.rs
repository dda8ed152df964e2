//! Error types raised by methods, strategies and slot handlers

use crate::kind::MemberKind;

/// Result type for member calls and slot access
pub type CallResult<T> = Result<T, CallError>;

/// Failure of a member call or slot access.
///
/// Errors produced inside a forwarding strategy or a slot handler travel
/// through surrogate members untouched, so a surrogate fails exactly where
/// the original would.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallError {
    /// No method with this name on the class or any ancestor
    #[error("Can't locate method '{method}' via class '{class}'")]
    MethodNotFound {
        /// Class searched
        class: String,
        /// Method name
        method: String,
    },

    /// The class has no data slot of this kind and name
    #[error("No {kind} slot '{member}' on class '{class}'")]
    SlotNotFound {
        /// Class searched
        class: String,
        /// Member name
        member: String,
        /// Requested slot kind
        kind: MemberKind,
    },

    /// Value shape does not fit the requested access
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected shape
        expected: String,
        /// Actual shape
        got: String,
    },

    /// A sequence index too large to address
    #[error("Index {0} out of range")]
    IndexOutOfRange(usize),

    /// A member that needs an instance was called without one
    #[error("Member '{0}' called without an instance")]
    MissingInvocant(String),

    /// An expected instance attribute is absent
    #[error("Missing attribute '{0}'")]
    MissingAttribute(String),

    /// Failure reported by a slot handler
    #[error("Handler error: {0}")]
    Handler(String),

    /// Failure reported by a method or forwarding strategy
    #[error("{0}")]
    Strategy(String),
}

impl CallError {
    /// Shorthand for a shape mismatch
    pub fn mismatch(expected: &str, got: &str) -> Self {
        CallError::TypeMismatch {
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }
}

impl From<String> for CallError {
    fn from(s: String) -> Self {
        CallError::Strategy(s)
    }
}

impl From<&str> for CallError {
    fn from(s: &str) -> Self {
        CallError::Strategy(s.to_string())
    }
}
