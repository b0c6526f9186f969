//! The default-value policy.
//!
//! When a parent in the chain is absent, the evaluator substitutes a value
//! chosen from the declared type alone. First match wins:
//!
//! | declared type        | substitute                      |
//! |----------------------|---------------------------------|
//! | `string`             | `""`                            |
//! | value type           | zero instance (`false`, `0`, …) |
//! | `set<T>`             | new empty set of `T`            |
//! | anything else        | `Absent`                        |
//!
//! Other containers (lists, sequences) and reference types stay absent.

use crate::error::EvalResult;
use crate::introspect::TypeIntrospector;
use safepath_types::{DeclaredType, Value};

/// The safe substitute for an absent parent at a point declared as `ty`.
pub fn default_for<I>(introspector: &I, ty: &DeclaredType) -> EvalResult<Value>
where
    I: TypeIntrospector + ?Sized,
{
    match ty {
        DeclaredType::String => Ok(Value::String(String::new())),
        ty if ty.is_value_type() => introspector.zero_value(ty),
        DeclaredType::Set(element) => Ok(introspector.empty_set(element)),
        _ => Ok(Value::Absent),
    }
}
