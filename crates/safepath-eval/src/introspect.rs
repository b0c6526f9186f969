//! The introspection capability the evaluator is built on.

use crate::error::{EvalError, EvalResult};
use safepath_types::{DeclaredType, MemberId, MethodId, SetValue, StructValue, Value};

/// A bound lambda argument, callable for the duration of one extension call.
pub type Lambda<'a> = &'a dyn Fn(Value) -> EvalResult<Value>;

/// Reads members, invokes methods, and builds zero/empty values by type.
///
/// The evaluator never inspects host objects itself; everything it knows
/// about object shapes comes through this trait. Implementations must not
/// be handed [`Value::Absent`] as an instance: the evaluator substitutes a
/// default before that could happen.
pub trait TypeIntrospector {
    /// Read a field or property off `instance`.
    fn read_member(&self, instance: &Value, member: &MemberId) -> EvalResult<Value>;

    /// Invoke `method` on `instance` with already-evaluated arguments.
    fn invoke(&self, instance: &Value, method: &MethodId, args: Vec<Value>) -> EvalResult<Value>;

    /// Invoke an extension-style function: `receiver` is its first parameter,
    /// `lambda` its optional second.
    fn invoke_extension(
        &self,
        method: &MethodId,
        receiver: Value,
        lambda: Option<Lambda<'_>>,
    ) -> EvalResult<Value>;

    /// The zero-initialized instance of `ty`.
    ///
    /// Reference types zero to `Absent`. Implementations that know struct
    /// layouts override this to build user value types.
    fn zero_value(&self, ty: &DeclaredType) -> EvalResult<Value> {
        zero_builtin(ty)
    }

    /// A new, empty set of `element`.
    fn empty_set(&self, element: &DeclaredType) -> Value {
        Value::Set(SetValue::new(element.clone()))
    }
}

/// Zero values for every type that needs no layout information.
pub fn zero_builtin(ty: &DeclaredType) -> EvalResult<Value> {
    match ty {
        DeclaredType::Bool => Ok(Value::Bool(false)),
        DeclaredType::Int => Ok(Value::Int(0)),
        DeclaredType::Long => Ok(Value::Long(0)),
        DeclaredType::Double => Ok(Value::Double(0.0)),
        DeclaredType::Struct(name) => Err(EvalError::UnregisteredType(name.clone())),
        _ => Ok(Value::Absent),
    }
}

/// Zero a struct field-by-field from its declared layout.
pub(crate) fn zero_struct<I>(
    introspector: &I,
    name: &str,
    fields: &[(String, DeclaredType)],
) -> EvalResult<Value>
where
    I: TypeIntrospector + ?Sized,
{
    let mut zeroed = Vec::with_capacity(fields.len());
    for (field, ty) in fields {
        zeroed.push((field.clone(), introspector.zero_value(ty)?));
    }
    Ok(Value::Struct(StructValue::new(name, zeroed)))
}
