//! Registration-based [`TypeIntrospector`].
//!
//! Rust has no runtime reflection, so every host type a path touches is
//! registered once: its readable members, its callable methods, and for
//! value types the field layout used to build zero instances.
//!
//! ```
//! use safepath_eval::TypeRegistry;
//! use safepath_types::{DeclaredType, Value};
//!
//! struct Customer {
//!     name: String,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry
//!     .class::<Customer>("Customer")
//!     .member("name", |c| Value::from(c.name.clone()));
//! registry.value_type("Point", vec![("x", DeclaredType::Int), ("y", DeclaredType::Int)]);
//! ```

use crate::error::{EvalError, EvalResult};
use crate::extensions;
use crate::introspect::{zero_builtin, zero_struct, Lambda, TypeIntrospector};
use safepath_types::{DeclaredType, MemberId, MethodId, ObjectRef, Value};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;

type Getter = Box<dyn Fn(&ObjectRef) -> EvalResult<Value> + Send + Sync>;
type MethodBody = Box<dyn Fn(&ObjectRef, &[Value]) -> EvalResult<Value> + Send + Sync>;

/// A function callable extension style.
pub type ExtensionFn =
    Box<dyn Fn(&MethodId, Value, Option<Lambda<'_>>) -> EvalResult<Value> + Send + Sync>;

struct RegisteredMethod {
    arity: usize,
    body: MethodBody,
}

/// Members and methods of one registered host type.
struct ClassAdapter {
    name: String,
    members: HashMap<String, Getter>,
    methods: HashMap<String, RegisteredMethod>,
}

impl ClassAdapter {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: HashMap::new(),
            methods: HashMap::new(),
        }
    }
}

/// Introspector backed by explicit per-type registration.
#[derive(Default)]
pub struct TypeRegistry {
    classes: HashMap<TypeId, ClassAdapter>,
    structs: HashMap<String, Vec<(String, DeclaredType)>>,
    extensions: HashMap<String, ExtensionFn>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the standard sequence extensions
    /// (`to_list`, `to_set`, `count`, `any`, `single`, `first`, `where`, `select`).
    pub fn with_sequence_extensions() -> Self {
        let mut registry = Self::new();
        extensions::register_sequence_extensions(&mut registry);
        registry
    }

    /// Register (or extend) the host type `T` under a display name.
    pub fn class<T: Any + Send + Sync>(&mut self, name: &str) -> ClassBuilder<'_, T> {
        let adapter = self
            .classes
            .entry(TypeId::of::<T>())
            .or_insert_with(|| ClassAdapter::new(name));
        ClassBuilder {
            adapter,
            _marker: PhantomData,
        }
    }

    /// Record the field layout of a value type.
    pub fn value_type(&mut self, name: &str, fields: Vec<(&str, DeclaredType)>) -> &mut Self {
        let fields = fields
            .into_iter()
            .map(|(field, ty)| (field.to_string(), ty))
            .collect();
        self.structs.insert(name.to_string(), fields);
        self
    }

    /// Register a free function callable extension style.
    pub fn extension<F>(&mut self, name: &str, body: F) -> &mut Self
    where
        F: Fn(&MethodId, Value, Option<Lambda<'_>>) -> EvalResult<Value> + Send + Sync + 'static,
    {
        self.extensions.insert(name.to_string(), Box::new(body));
        self
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    fn adapter(&self, obj: &ObjectRef) -> EvalResult<&ClassAdapter> {
        self.classes
            .get(&obj.type_id())
            .ok_or_else(|| EvalError::UnregisteredType(obj.type_name().to_string()))
    }
}

impl TypeIntrospector for TypeRegistry {
    fn read_member(&self, instance: &Value, member: &MemberId) -> EvalResult<Value> {
        match instance {
            Value::Object(obj) => {
                let adapter = self.adapter(obj)?;
                let getter =
                    adapter
                        .members
                        .get(&member.name)
                        .ok_or_else(|| EvalError::MemberNotFound {
                            type_name: adapter.name.clone(),
                            member: member.name.clone(),
                        })?;
                getter(obj)
            }
            Value::Struct(s) => {
                s.field(&member.name)
                    .cloned()
                    .ok_or_else(|| EvalError::MemberNotFound {
                        type_name: s.type_name.clone(),
                        member: member.name.clone(),
                    })
            }
            other => Err(EvalError::MemberNotFound {
                type_name: other.type_name(),
                member: member.name.clone(),
            }),
        }
    }

    fn invoke(&self, instance: &Value, method: &MethodId, args: Vec<Value>) -> EvalResult<Value> {
        if let Value::Object(obj) = instance {
            let adapter = self.adapter(obj)?;
            if let Some(registered) = adapter.methods.get(&method.name) {
                check_arity(&adapter.name, &method.name, registered.arity, args.len())?;
                return (registered.body)(obj, &args);
            }
        }
        invoke_builtin(instance, method, args)
    }

    fn invoke_extension(
        &self,
        method: &MethodId,
        receiver: Value,
        lambda: Option<Lambda<'_>>,
    ) -> EvalResult<Value> {
        let body = self
            .extensions
            .get(&method.name)
            .ok_or_else(|| EvalError::ExtensionNotFound(method.name.clone()))?;
        body(method, receiver, lambda)
    }

    fn zero_value(&self, ty: &DeclaredType) -> EvalResult<Value> {
        if let DeclaredType::Struct(name) = ty {
            if let Some(fields) = self.structs.get(name) {
                return zero_struct(self, name, fields);
            }
        }
        zero_builtin(ty)
    }
}

/// Methods every value answers unless its class registers the same name.
fn invoke_builtin(instance: &Value, method: &MethodId, args: Vec<Value>) -> EvalResult<Value> {
    let type_name = instance.type_name();
    match method.name.as_str() {
        "to_string" => {
            check_arity(&type_name, "to_string", 0, args.len())?;
            Ok(Value::String(instance.to_string()))
        }
        "equals" => {
            check_arity(&type_name, "equals", 1, args.len())?;
            Ok(Value::Bool(args[0] == *instance))
        }
        _ => Err(EvalError::MethodNotFound {
            type_name,
            method: method.name.clone(),
        }),
    }
}

fn check_arity(type_name: &str, method: &str, expected: usize, got: usize) -> EvalResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(EvalError::ArgumentMismatch(format!(
            "`{type_name}.{method}` takes {expected} argument(s), got {got}"
        )))
    }
}

fn downcast<'o, T: Any>(obj: &'o ObjectRef, type_name: &str) -> EvalResult<&'o T> {
    obj.downcast_ref::<T>()
        .ok_or_else(|| EvalError::TypeMismatch(format!("object is not a `{type_name}`")))
}

// ══════════════════════════════════════════════════════════════════════════════
// Class registration
// ══════════════════════════════════════════════════════════════════════════════

/// Builder returned by [`TypeRegistry::class`].
pub struct ClassBuilder<'r, T> {
    adapter: &'r mut ClassAdapter,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Any + Send + Sync> ClassBuilder<'_, T> {
    /// Expose a field or property.
    pub fn member<F>(self, name: &str, getter: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let type_name = self.adapter.name.clone();
        self.adapter.members.insert(
            name.to_string(),
            Box::new(move |obj: &ObjectRef| -> EvalResult<Value> {
                Ok(getter(downcast::<T>(obj, &type_name)?))
            }),
        );
        self
    }

    /// Expose a method taking exactly `arity` arguments.
    pub fn method<F>(self, name: &str, arity: usize, body: F) -> Self
    where
        F: Fn(&T, &[Value]) -> EvalResult<Value> + Send + Sync + 'static,
    {
        let type_name = self.adapter.name.clone();
        self.adapter.methods.insert(
            name.to_string(),
            RegisteredMethod {
                arity,
                body: Box::new(move |obj: &ObjectRef, args: &[Value]| -> EvalResult<Value> {
                    body(downcast::<T>(obj, &type_name)?, args)
                }),
            },
        );
        self
    }
}
