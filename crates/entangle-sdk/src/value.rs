//! Dynamic values carried through methods, attributes and slots

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::object::ObjectRef;

/// Key-addressable value storage
pub type ValueMap = BTreeMap<String, Value>;

/// Dynamic value.
///
/// Data compares structurally; objects and streams compare by identity.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent / undefined
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// String
    Str(String),
    /// Ordered list
    List(Vec<Value>),
    /// String-keyed map
    Map(ValueMap),
    /// I/O handle
    Stream(StreamHandle),
    /// Object instance
    Object(ObjectRef),
}

impl Value {
    /// Shape name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Stream(_) => "stream",
            Value::Object(_) => "object",
        }
    }

    /// Check for null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float (integers widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as map
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get as stream handle
    pub fn as_stream(&self) -> Option<&StreamHandle> {
        match self {
            Value::Stream(stream) => Some(stream),
            _ => None,
        }
    }

    /// Get as object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Stream(a), Value::Stream(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Value::Stream(stream) => write!(f, "<stream {}>", stream.label()),
            Value::Object(obj) => write!(f, "<{} object>", obj.class().name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl From<StreamHandle> for Value {
    fn from(stream: StreamHandle) -> Self {
        Value::Stream(stream)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

// ============================================================================
// StreamHandle
// ============================================================================

#[derive(Debug, Default)]
struct StreamBuffer {
    input: VecDeque<String>,
    output: Vec<String>,
}

/// In-memory, line-oriented duplex I/O handle.
///
/// Clones share the same buffers.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    label: Arc<str>,
    buffer: Arc<Mutex<StreamBuffer>>,
}

impl StreamHandle {
    /// Create an empty handle
    pub fn new(label: &str) -> Self {
        Self {
            label: Arc::from(label),
            buffer: Arc::new(Mutex::new(StreamBuffer::default())),
        }
    }

    /// Handle label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Queue a line for reading
    pub fn push_input(&self, line: impl Into<String>) {
        self.buffer.lock().input.push_back(line.into());
    }

    /// Read the next queued line
    pub fn read_line(&self) -> Option<String> {
        self.buffer.lock().input.pop_front()
    }

    /// Write a line
    pub fn write(&self, line: impl Into<String>) {
        self.buffer.lock().output.push(line.into());
    }

    /// Everything written so far
    pub fn written(&self) -> Vec<String> {
        self.buffer.lock().output.clone()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &StreamHandle) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }
}
