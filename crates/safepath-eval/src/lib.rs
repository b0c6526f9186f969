//! safepath evaluator: null-safe path evaluation.
//!
//! Walks a [`PathExpr`] (member reads and method calls rooted at a
//! parameter) against a root value. When any parent along the way is
//! absent, evaluation stops and a default chosen from the declared type at
//! that point is returned instead of failing.
//!
//! ```
//! use safepath_eval::{PathEvaluator, TypeRegistry};
//! use safepath_types::{DeclaredType, PathExpr, Value};
//! use std::sync::Arc;
//!
//! struct Address {
//!     city: String,
//! }
//! struct Customer {
//!     address: Option<Arc<Address>>,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry
//!     .class::<Customer>("Customer")
//!     .member("address", |c| Value::object_opt(c.address.as_ref()));
//! registry
//!     .class::<Address>("Address")
//!     .member("city", |a| Value::from(a.city.clone()));
//!
//! let path = PathExpr::parameter("c", DeclaredType::class("Customer"))
//!     .member("address", DeclaredType::class("Address"))
//!     .member("city", DeclaredType::String);
//!
//! let evaluator = PathEvaluator::new(registry);
//! let root = Value::object(Customer { address: None });
//! assert_eq!(evaluator.try_fetch(&root, &path), Ok(Value::from("")));
//! ```

mod config;
mod defaults;
mod env;
mod error;
mod evaluator;
mod extensions;
mod introspect;
mod registry;

pub use config::{EvalConfig, DEFAULT_MAX_DEPTH};
pub use defaults::default_for;
pub use error::{EvalError, EvalResult};
pub use evaluator::{Evaluated, Evaluator};
pub use introspect::{zero_builtin, Lambda, TypeIntrospector};
pub use registry::{ClassBuilder, ExtensionFn, TypeRegistry};

use safepath_types::{FromValue, PathExpr, Value};
use tracing::debug;

/// Evaluate `path` against `root`, substituting policy defaults for absent
/// parents. The result may itself be `Absent` for reference types.
pub fn try_fetch<I>(introspector: &I, root: &Value, path: &PathExpr) -> EvalResult<Value>
where
    I: TypeIntrospector + ?Sized,
{
    evaluate(introspector, root, path).map(|evaluated| evaluated.value)
}

/// Like [`try_fetch`], but an absent result, or the `""` standing in for a
/// string read off a missing parent, is replaced by `fallback`.
///
/// Value-typed paths never fall back: they always produce at least a zero
/// value. Nor do sets defaulted to empty.
pub fn try_fetch_or<I>(
    introspector: &I,
    root: &Value,
    path: &PathExpr,
    fallback: Value,
) -> EvalResult<Value>
where
    I: TypeIntrospector + ?Sized,
{
    let evaluated = evaluate(introspector, root, path)?;
    Ok(or_fallback(evaluated, fallback))
}

/// Evaluate `path` and keep the declared type and defaulting flag.
pub fn evaluate<I>(introspector: &I, root: &Value, path: &PathExpr) -> EvalResult<Evaluated>
where
    I: TypeIntrospector + ?Sized,
{
    let config = EvalConfig::default();
    Evaluator::new(introspector, &config, root).eval(path)
}

fn or_fallback(evaluated: Evaluated, fallback: Value) -> Value {
    if evaluated.wants_fallback() {
        debug!(declared = %evaluated.ty, fallback = %fallback, "no value; using fallback");
        fallback
    } else {
        evaluated.value
    }
}

/// An introspector bundled with evaluation settings.
pub struct PathEvaluator<I> {
    introspector: I,
    config: EvalConfig,
}

impl<I: TypeIntrospector> PathEvaluator<I> {
    pub fn new(introspector: I) -> Self {
        Self::with_config(introspector, EvalConfig::default())
    }

    pub fn with_config(introspector: I, config: EvalConfig) -> Self {
        Self {
            introspector,
            config,
        }
    }

    pub fn introspector(&self) -> &I {
        &self.introspector
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate and keep the declared type and defaulting flag.
    pub fn evaluate(&self, root: &Value, path: &PathExpr) -> EvalResult<Evaluated> {
        Evaluator::new(&self.introspector, &self.config, root).eval(path)
    }

    /// Evaluate-or-default.
    pub fn try_fetch(&self, root: &Value, path: &PathExpr) -> EvalResult<Value> {
        self.evaluate(root, path).map(|evaluated| evaluated.value)
    }

    /// Evaluate-or-fallback.
    pub fn try_fetch_or(
        &self,
        root: &Value,
        path: &PathExpr,
        fallback: Value,
    ) -> EvalResult<Value> {
        let evaluated = self.evaluate(root, path)?;
        Ok(or_fallback(evaluated, fallback))
    }

    /// Evaluate and convert the result into a Rust type.
    pub fn try_fetch_as<T: FromValue>(&self, root: &Value, path: &PathExpr) -> EvalResult<T> {
        let value = self.try_fetch(root, path)?;
        Ok(T::from_value(value)?)
    }
}
