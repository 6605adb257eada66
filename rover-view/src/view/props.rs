use super::node::Node;
use smartstring::{LazyCompact, SmartString};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub type PropKey = SmartString<LazyCompact>;

/// Declared props of a node. Replaced wholesale on every reconciliation.
pub type Props = HashMap<PropKey, PropValue>;

/// Shared event callback carried as a prop value
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }

    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// A prop or scratch value
#[derive(Clone, Debug)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(SmartString<LazyCompact>),
    Callback(Callback),
    Node(Node),
    /// Arbitrary shared host value, matched by its concrete type
    Any(Rc<dyn Any>),
}

impl PropValue {
    pub fn any<T: Any>(value: T) -> Self {
        PropValue::Any(Rc::new(value))
    }

    /// Name of the runtime type, used in binding diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropValue::Bool(_) => "bool",
            PropValue::Int(_) => "int",
            PropValue::Float(_) => "float",
            PropValue::Str(_) => "string",
            PropValue::Callback(_) => "callback",
            PropValue::Node(_) => "node",
            PropValue::Any(_) => "any",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a == b,
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Callback(a), PropValue::Callback(b)) => a.ptr_eq(b),
            (PropValue::Node(a), PropValue::Node(b)) => a.ptr_eq(b),
            (PropValue::Any(a), PropValue::Any(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(value.into())
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.into())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value.into())
    }
}

impl From<SmartString<LazyCompact>> for PropValue {
    fn from(value: SmartString<LazyCompact>) -> Self {
        PropValue::Str(value)
    }
}

impl From<Callback> for PropValue {
    fn from(value: Callback) -> Self {
        PropValue::Callback(value)
    }
}

impl From<Node> for PropValue {
    fn from(value: Node) -> Self {
        PropValue::Node(value)
    }
}

/// Conversion from a prop value into a bound field's type.
///
/// `None` means the value is not assignable to the field.
pub trait FromProp: Sized + 'static {
    fn from_prop(value: &PropValue) -> Option<Self>;
}

impl FromProp for PropValue {
    fn from_prop(value: &PropValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromProp for bool {
    fn from_prop(value: &PropValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromProp for i64 {
    fn from_prop(value: &PropValue) -> Option<Self> {
        value.as_int()
    }
}

impl FromProp for f64 {
    fn from_prop(value: &PropValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromProp for String {
    fn from_prop(value: &PropValue) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromProp for SmartString<LazyCompact> {
    fn from_prop(value: &PropValue) -> Option<Self> {
        match value {
            PropValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromProp for Callback {
    fn from_prop(value: &PropValue) -> Option<Self> {
        match value {
            PropValue::Callback(cb) => Some(cb.clone()),
            _ => None,
        }
    }
}

impl FromProp for Node {
    fn from_prop(value: &PropValue) -> Option<Self> {
        match value {
            PropValue::Node(node) => Some(node.clone()),
            _ => None,
        }
    }
}

impl<T: Any> FromProp for Rc<T> {
    fn from_prop(value: &PropValue) -> Option<Self> {
        match value {
            PropValue::Any(any) => any.clone().downcast::<T>().ok(),
            _ => None,
        }
    }
}
