//! Standard sequence extensions, callable extension style on lists and sets.

use crate::error::{EvalError, EvalResult};
use crate::introspect::Lambda;
use crate::registry::TypeRegistry;
use safepath_types::{DeclaredType, MethodId, SetValue, Value};

pub(crate) fn register_sequence_extensions(registry: &mut TypeRegistry) {
    registry
        .extension("to_list", |method, receiver, lambda| {
            no_lambda(method, lambda)?;
            Ok(Value::List(items(method, receiver)?))
        })
        .extension("to_set", |method, receiver, lambda| {
            no_lambda(method, lambda)?;
            let element = method
                .ret
                .set_element()
                .cloned()
                .unwrap_or(DeclaredType::Any);
            Ok(Value::Set(SetValue::from_items(
                element,
                items(method, receiver)?,
            )))
        })
        .extension("count", |method, receiver, lambda| {
            let matched = filter(items(method, receiver)?, lambda)?;
            let count = i32::try_from(matched.len())
                .map_err(|_| EvalError::Invocation("count overflows int".into()))?;
            Ok(Value::Int(count))
        })
        .extension("any", |method, receiver, lambda| {
            let items = items(method, receiver)?;
            match lambda {
                Some(predicate) => {
                    for item in items {
                        if test(predicate, item)? {
                            return Ok(Value::Bool(true));
                        }
                    }
                    Ok(Value::Bool(false))
                }
                None => Ok(Value::Bool(!items.is_empty())),
            }
        })
        .extension("single", |method, receiver, lambda| {
            let mut matched = filter(items(method, receiver)?, lambda)?;
            match matched.len() {
                1 => Ok(matched.remove(0)),
                0 => Err(EvalError::Invocation(
                    "`single`: sequence contains no matching element".into(),
                )),
                n => Err(EvalError::Invocation(format!(
                    "`single`: sequence contains {n} matching elements"
                ))),
            }
        })
        .extension("first", |method, receiver, lambda| {
            filter(items(method, receiver)?, lambda)?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    EvalError::Invocation("`first`: sequence contains no matching element".into())
                })
        })
        .extension("where", |method, receiver, lambda| {
            let predicate = require_lambda(method, lambda)?;
            Ok(Value::List(filter(items(method, receiver)?, Some(predicate))?))
        })
        .extension("select", |method, receiver, lambda| {
            let selector = require_lambda(method, lambda)?;
            let mut selected = Vec::new();
            for item in items(method, receiver)? {
                selected.push(selector(item)?);
            }
            Ok(Value::List(selected))
        });
}

fn items(method: &MethodId, receiver: Value) -> EvalResult<Vec<Value>> {
    match receiver {
        Value::List(items) => Ok(items),
        Value::Set(set) => Ok(set.into_items()),
        other => Err(EvalError::ArgumentMismatch(format!(
            "`{}` expects a list or set, got {}",
            method.name,
            other.type_name()
        ))),
    }
}

fn filter(items: Vec<Value>, predicate: Option<Lambda<'_>>) -> EvalResult<Vec<Value>> {
    let Some(predicate) = predicate else {
        return Ok(items);
    };
    let mut kept = Vec::new();
    for item in items {
        if test(predicate, item.clone())? {
            kept.push(item);
        }
    }
    Ok(kept)
}

fn test(predicate: Lambda<'_>, item: Value) -> EvalResult<bool> {
    match predicate(item)? {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::TypeMismatch(format!(
            "predicate must return bool, got {}",
            other.type_name()
        ))),
    }
}

fn require_lambda<'l>(method: &MethodId, lambda: Option<Lambda<'l>>) -> EvalResult<Lambda<'l>> {
    lambda.ok_or_else(|| {
        EvalError::ArgumentMismatch(format!("`{}` requires a lambda argument", method.name))
    })
}

fn no_lambda(method: &MethodId, lambda: Option<Lambda<'_>>) -> EvalResult<()> {
    match lambda {
        Some(_) => Err(EvalError::ArgumentMismatch(format!(
            "`{}` takes no lambda argument",
            method.name
        ))),
        None => Ok(()),
    }
}
