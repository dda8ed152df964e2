//! Member kinds

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Shape of a reflected member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    /// Callable member (method)
    Invocable,
    /// Single-value slot
    Scalar,
    /// Ordered, index-addressable slot
    Sequence,
    /// Key-addressable slot
    Mapping,
    /// Open-ended I/O handle slot
    Stream,
}

impl MemberKind {
    /// Every kind, invocable first
    pub const ALL: [MemberKind; 5] = [
        MemberKind::Invocable,
        MemberKind::Scalar,
        MemberKind::Sequence,
        MemberKind::Mapping,
        MemberKind::Stream,
    ];

    /// The four data-slot kinds
    pub const DATA: [MemberKind; 4] = [
        MemberKind::Scalar,
        MemberKind::Sequence,
        MemberKind::Mapping,
        MemberKind::Stream,
    ];

    /// Classify a value by its current shape
    pub fn of_value(value: &Value) -> MemberKind {
        match value {
            Value::List(_) => MemberKind::Sequence,
            Value::Map(_) => MemberKind::Mapping,
            Value::Stream(_) => MemberKind::Stream,
            _ => MemberKind::Scalar,
        }
    }

    /// Whether this is a data-slot kind
    pub fn is_data(self) -> bool {
        self != MemberKind::Invocable
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            MemberKind::Invocable => "invocable",
            MemberKind::Scalar => "scalar",
            MemberKind::Sequence => "sequence",
            MemberKind::Mapping => "mapping",
            MemberKind::Stream => "stream",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
