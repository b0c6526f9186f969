//! Core path evaluator.

use crate::config::EvalConfig;
use crate::defaults::default_for;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::introspect::{Lambda, TypeIntrospector};
use safepath_types::{DeclaredType, LambdaExpr, MemberId, MethodId, PathExpr, Value};
use tracing::{debug, trace};

/// The result of evaluating a path: the value, the path's declared type, and
/// whether the value was substituted by the default policy rather than read.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated {
    pub value: Value,
    pub ty: DeclaredType,
    pub defaulted: bool,
}

impl Evaluated {
    /// True when a caller-supplied fallback should replace this result:
    /// the value is absent, or it is the empty string standing in for a
    /// string read off a missing parent. Zero values and empty sets are kept.
    pub fn wants_fallback(&self) -> bool {
        self.value.is_absent() || (self.defaulted && self.ty == DeclaredType::String)
    }
}

/// Whether a node's value was read or substituted.
enum Resolved {
    Read(Value),
    Default(Value),
}

impl Resolved {
    fn into_value(self) -> Value {
        match self {
            Self::Read(value) | Self::Default(value) => value,
        }
    }
}

/// Walks a [`PathExpr`] against one root value.
///
/// Parents are always resolved before children. As soon as a parent comes
/// back absent the member or method is skipped and the default for the
/// declared type at that point is returned instead.
pub struct Evaluator<'a, I: ?Sized> {
    introspector: &'a I,
    config: &'a EvalConfig,
    root: &'a Value,
    /// Lambda parameters in scope.
    env: Environment,
}

impl<'a, I> Evaluator<'a, I>
where
    I: TypeIntrospector + ?Sized,
{
    pub fn new(introspector: &'a I, config: &'a EvalConfig, root: &'a Value) -> Self {
        Self {
            introspector,
            config,
            root,
            env: Environment::new(),
        }
    }

    /// Evaluate a path to a value, a policy default, or `Absent`.
    pub fn eval(&self, expr: &PathExpr) -> EvalResult<Evaluated> {
        let (value, defaulted) = match self.eval_at(expr, 0)? {
            Resolved::Read(value) => (value, false),
            Resolved::Default(value) => (value, true),
        };
        Ok(Evaluated {
            value,
            ty: expr.declared_type(),
            defaulted,
        })
    }

    fn eval_value(&self, expr: &PathExpr, depth: usize) -> EvalResult<Value> {
        self.eval_at(expr, depth).map(Resolved::into_value)
    }

    fn eval_at(&self, expr: &PathExpr, depth: usize) -> EvalResult<Resolved> {
        if depth > self.config.max_depth {
            return Err(EvalError::DepthExceeded(self.config.max_depth));
        }
        trace!(kind = expr.kind_name(), depth, "eval");
        match expr {
            PathExpr::Constant { value, .. } => Ok(Resolved::Read(Value::from_literal(value))),
            PathExpr::Parameter { name, .. } => Ok(Resolved::Read(self.eval_parameter(name))),
            PathExpr::MemberAccess { target, member } => {
                self.eval_member_access(target, member, depth)
            }
            PathExpr::MethodCall {
                receiver: Some(receiver),
                method,
                args,
            } => self.eval_method_call(receiver, method, args, depth),
            PathExpr::MethodCall {
                receiver: None,
                method,
                args,
            } => self.eval_extension_call(method, args, depth),
            PathExpr::Lambda(lambda) => Err(EvalError::UnsupportedNode(format!(
                "lambda `{} => ...` can only appear as the second argument of an extension call",
                lambda.param
            ))),
        }
    }

    // ── Roots ────────────────────────────────────────────────────────────

    fn eval_parameter(&self, name: &str) -> Value {
        match self.env.get(name) {
            Some(bound) => bound.clone(),
            None => self.root.clone(),
        }
    }

    // ── Member access & calls ────────────────────────────────────────────

    fn eval_member_access(
        &self,
        target: &PathExpr,
        member: &MemberId,
        depth: usize,
    ) -> EvalResult<Resolved> {
        let parent = self.eval_value(target, depth + 1)?;
        if parent.is_absent() {
            return self.default_for_absent_parent(&member.ty, &member.name);
        }
        self.introspector.read_member(&parent, member).map(Resolved::Read)
    }

    /// Arguments are evaluated against the root, not the receiver. A method
    /// that legitimately returns `Absent` is passed through unchanged.
    fn eval_method_call(
        &self,
        receiver: &PathExpr,
        method: &MethodId,
        args: &[PathExpr],
        depth: usize,
    ) -> EvalResult<Resolved> {
        let parent = self.eval_value(receiver, depth + 1)?;
        if parent.is_absent() {
            return self.default_for_absent_parent(&method.ret, &method.name);
        }
        let mut arg_vals = Vec::with_capacity(args.len());
        for arg in args {
            arg_vals.push(self.eval_value(arg, depth + 1)?);
        }
        self.introspector
            .invoke(&parent, method, arg_vals)
            .map(Resolved::Read)
    }

    /// `f(receiver)` or `f(receiver, lambda)`.
    ///
    /// The receiver is evaluated before the argument shape is checked, so an
    /// absent receiver defaults even when the remaining arguments are malformed.
    fn eval_extension_call(
        &self,
        method: &MethodId,
        args: &[PathExpr],
        depth: usize,
    ) -> EvalResult<Resolved> {
        let Some(first) = args.first() else {
            return Err(EvalError::MalformedExtensionCall(format!(
                "`{}` has no receiver argument",
                method.name
            )));
        };
        let parent = self.eval_value(first, depth + 1)?;
        if parent.is_absent() {
            return self.default_for_absent_parent(&method.ret, &method.name);
        }
        let result = match &args[1..] {
            [] => self.introspector.invoke_extension(method, parent, None),
            [PathExpr::Lambda(lambda)] => {
                let callable = self.bind_lambda(lambda, depth + 1);
                let callable: Lambda<'_> = &*callable;
                self.introspector
                    .invoke_extension(method, parent, Some(callable))
            }
            [other] => Err(EvalError::MalformedExtensionCall(format!(
                "second argument of `{}` must be a lambda, found {}",
                method.name,
                other.kind_name()
            ))),
            rest => Err(EvalError::MalformedExtensionCall(format!(
                "`{}` takes at most 2 arguments, got {}",
                method.name,
                rest.len() + 1
            ))),
        };
        result.map(Resolved::Read)
    }

    // ── Lambdas ──────────────────────────────────────────────────────────

    /// Turn a lambda node into a callable evaluating its body with the
    /// parameter bound. The callable borrows this evaluator and is only
    /// valid for the duration of the enclosing extension call.
    fn bind_lambda<'s>(
        &'s self,
        lambda: &'s LambdaExpr,
        depth: usize,
    ) -> Box<dyn Fn(Value) -> EvalResult<Value> + 's> {
        Box::new(move |arg| {
            self.with_binding(&lambda.param, arg)
                .eval_value(&lambda.body, depth + 1)
        })
    }

    fn with_binding(&self, name: &str, value: Value) -> Evaluator<'a, I> {
        let mut env = self.env.clone();
        env.push_scope();
        env.define(name, value);
        Evaluator {
            introspector: self.introspector,
            config: self.config,
            root: self.root,
            env,
        }
    }

    // ── Defaulting ───────────────────────────────────────────────────────

    fn default_for_absent_parent(&self, ty: &DeclaredType, at: &str) -> EvalResult<Resolved> {
        let value = default_for(self.introspector, ty)?;
        debug!(at, declared = %ty, substitute = ?value, "absent parent; using default");
        Ok(Resolved::Default(value))
    }
}
