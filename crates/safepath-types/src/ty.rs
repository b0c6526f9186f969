//! Declared (static) type descriptors.
//!
//! A [`DeclaredType`] is attached to every path node. Defaulting decisions are
//! made from these descriptors alone, never from a runtime value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The static type declared at a point in a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum DeclaredType {
    // ── Primitives ──
    String,
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    Double,

    // ── User-Defined ──
    /// A fixed-size value type. Always fully initialized; never absent.
    Struct(std::string::String),
    /// A reference type. May be absent.
    Class(std::string::String),

    // ── Generic containers ──
    /// `set<T>`
    Set(Box<DeclaredType>),
    /// `list<T>`: an ordered, materialized sequence.
    List(Box<DeclaredType>),
    /// A lazily produced sequence of `T`.
    Sequence(Box<DeclaredType>),
    /// `(T1, T2, ...) -> R`
    Function(Vec<DeclaredType>, Box<DeclaredType>),

    // ── Special ──
    /// Statically unknown reference type (e.g. the type of a `null` constant).
    Any,
    /// Methods that return nothing.
    Void,
}

impl DeclaredType {
    pub fn set_of(element: DeclaredType) -> Self {
        Self::Set(Box::new(element))
    }

    pub fn list_of(element: DeclaredType) -> Self {
        Self::List(Box::new(element))
    }

    pub fn sequence_of(element: DeclaredType) -> Self {
        Self::Sequence(Box::new(element))
    }

    pub fn class(name: impl Into<std::string::String>) -> Self {
        Self::Class(name.into())
    }

    pub fn value_struct(name: impl Into<std::string::String>) -> Self {
        Self::Struct(name.into())
    }

    /// True for types whose instances are non-nullable by construction.
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int | Self::Long | Self::Double | Self::Struct(_)
        )
    }

    /// The element type if this is `set<T>`.
    pub fn set_element(&self) -> Option<&DeclaredType> {
        match self {
            Self::Set(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Long => write!(f, "long"),
            Self::Double => write!(f, "double"),
            Self::Struct(name) | Self::Class(name) => write!(f, "{name}"),
            Self::Set(element) => write!(f, "set<{element}>"),
            Self::List(element) => write!(f, "list<{element}>"),
            Self::Sequence(element) => write!(f, "seq<{element}>"),
            Self::Function(params, ret) => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")
            }
            Self::Any => write!(f, "any"),
            Self::Void => write!(f, "void"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert!(DeclaredType::Bool.is_value_type());
        assert!(DeclaredType::Long.is_value_type());
        assert!(DeclaredType::value_struct("Point").is_value_type());
        assert!(!DeclaredType::String.is_value_type());
        assert!(!DeclaredType::class("Customer").is_value_type());
        assert!(!DeclaredType::set_of(DeclaredType::Int).is_value_type());
    }

    #[test]
    fn test_set_element_only_for_sets() {
        let set = DeclaredType::set_of(DeclaredType::String);
        assert_eq!(set.set_element(), Some(&DeclaredType::String));
        assert_eq!(DeclaredType::list_of(DeclaredType::String).set_element(), None);
    }

    #[test]
    fn test_display() {
        let f = DeclaredType::Function(
            vec![DeclaredType::Int],
            Box::new(DeclaredType::Bool),
        );
        assert_eq!(f.to_string(), "(int) -> bool");
        assert_eq!(
            DeclaredType::set_of(DeclaredType::class("Node")).to_string(),
            "set<Node>"
        );
    }
}
