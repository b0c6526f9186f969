//! Runtime values produced by path evaluation.

use crate::{DeclaredType, Literal};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A runtime value. `Absent` is the explicit "no value" marker.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Absent,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    /// An instance of a value type.
    Struct(StructValue),
    /// A reference to a host object.
    Object(ObjectRef),
    List(Vec<Value>),
    Set(SetValue),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Wrap a host object.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(ObjectRef::new(value))
    }

    /// Wrap an optional shared host object; `None` becomes `Absent`.
    pub fn object_opt<T: Any + Send + Sync>(value: Option<&Arc<T>>) -> Self {
        match value {
            Some(arc) => Self::Object(ObjectRef::from_arc(Arc::clone(arc))),
            None => Self::Absent,
        }
    }

    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Self::Absent,
            Literal::Bool(b) => Self::Bool(*b),
            Literal::Int(n) => Self::Int(*n),
            Literal::Long(n) => Self::Long(*n),
            Literal::Double(n) => Self::Double(*n),
            Literal::String(s) => Self::String(s.clone()),
        }
    }

    /// Human-readable name of the runtime kind.
    pub fn type_name(&self) -> String {
        match self {
            Self::Absent => "absent".into(),
            Self::Bool(_) => "bool".into(),
            Self::Int(_) => "int".into(),
            Self::Long(_) => "long".into(),
            Self::Double(_) => "double".into(),
            Self::String(_) => "string".into(),
            Self::Struct(s) => s.type_name.clone(),
            Self::Object(o) => o.type_name().to_string(),
            Self::List(_) => "list".into(),
            Self::Set(s) => format!("set<{}>", s.element),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Long(n) => write!(f, "{n}"),
            Self::Double(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Struct(s) => write!(f, "{s}"),
            Self::Object(o) => write!(f, "{}", o.type_name()),
            Self::List(items) => {
                write!(f, "[")?;
                write_joined(f, items)?;
                write!(f, "]")
            }
            Self::Set(set) => {
                write!(f, "{{")?;
                write_joined(f, &set.items)?;
                write!(f, "}}")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Host objects
// ══════════════════════════════════════════════════════════════════════════════

/// A shared reference to a host object of some registered Rust type.
///
/// Equality is identity: two refs are equal when they point at the same object.
#[derive(Clone)]
pub struct ObjectRef {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl ObjectRef {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_id: TypeId::of::<T>(),
            type_name: short_type_name(std::any::type_name::<T>()),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The unqualified Rust type name of the wrapped object.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({} @ {:p})", self.type_name, Arc::as_ptr(&self.inner))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Value-type instances
// ══════════════════════════════════════════════════════════════════════════════

/// An instance of a fixed-size value type: named fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

impl StructValue {
    pub fn new(type_name: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.type_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, " }}")
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Sets
// ══════════════════════════════════════════════════════════════════════════════

/// A mutable set of values with a declared element type.
///
/// Insertion order is preserved; duplicates (by value equality) are rejected.
#[derive(Debug, Clone)]
pub struct SetValue {
    pub element: DeclaredType,
    items: Vec<Value>,
}

impl SetValue {
    pub fn new(element: DeclaredType) -> Self {
        Self {
            element,
            items: Vec::new(),
        }
    }

    pub fn from_items(element: DeclaredType, items: impl IntoIterator<Item = Value>) -> Self {
        let mut set = Self::new(element);
        for item in items {
            set.insert(item);
        }
        set
    }

    /// Returns `false` if an equal value was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|item| item == value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

/// Sets compare by element type and membership, ignoring order.
impl PartialEq for SetValue {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
            && self.len() == other.len()
            && self.items.iter().all(|item| other.contains(item))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Typed extraction
// ══════════════════════════════════════════════════════════════════════════════

/// A value did not have the shape the caller asked for.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ConversionError {
    pub expected: &'static str,
    pub found: String,
}

impl ConversionError {
    fn new(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            found: found.type_name(),
        }
    }
}

/// Conversion from an evaluated [`Value`] into a Rust type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

macro_rules! impl_from_value {
    ($ty:ty, $expected:literal, $variant:ident) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ConversionError> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(ConversionError::new($expected, &other)),
                }
            }
        }
    };
}

impl_from_value!(bool, "bool", Bool);
impl_from_value!(i32, "int", Int);
impl_from_value!(f64, "double", Double);
impl_from_value!(String, "string", String);
impl_from_value!(Vec<Value>, "list", List);
impl_from_value!(SetValue, "set", Set);
impl_from_value!(StructValue, "struct", Struct);
impl_from_value!(ObjectRef, "object", Object);

/// Ints widen to long.
impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Long(n) => Ok(n),
            Value::Int(n) => Ok(i64::from(n)),
            other => Err(ConversionError::new("long", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Absent => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
