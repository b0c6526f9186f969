//! Path AST node types.
//!
//! A path is a small tree describing a chain of member reads and method
//! calls rooted at a parameter. Nodes are immutable once built and may be
//! evaluated any number of times against different roots.
//! Recursive children are boxed to keep enum sizes reasonable.

use crate::DeclaredType;
use serde::{Deserialize, Serialize};

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A member (field or property) name together with its declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberId {
    pub name: String,
    pub ty: DeclaredType,
}

impl MemberId {
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A method name with its declared parameter types and return type.
///
/// For extension-style methods the first parameter is the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodId {
    pub name: String,
    pub params: Vec<DeclaredType>,
    pub ret: DeclaredType,
}

impl MethodId {
    pub fn new(name: impl Into<String>, params: Vec<DeclaredType>, ret: DeclaredType) -> Self {
        Self {
            name: name.into(),
            params,
            ret,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Literals
// ══════════════════════════════════════════════════════════════════════════════

/// A constant carried by a [`PathExpr::Constant`] node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
}

impl Literal {
    /// The type a literal has when no explicit type is given.
    pub fn natural_type(&self) -> DeclaredType {
        match self {
            Self::Null => DeclaredType::Any,
            Self::Bool(_) => DeclaredType::Bool,
            Self::Int(_) => DeclaredType::Int,
            Self::Long(_) => DeclaredType::Long,
            Self::Double(_) => DeclaredType::Double,
            Self::String(_) => DeclaredType::String,
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Path expressions
// ══════════════════════════════════════════════════════════════════════════════

/// A node of a path description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum PathExpr {
    /// A literal value.
    Constant { value: Literal, ty: DeclaredType },
    /// The root object, or an enclosing lambda's argument when `name` is bound by one.
    Parameter { name: String, ty: DeclaredType },
    /// `target.member`
    MemberAccess {
        target: Box<PathExpr>,
        member: MemberId,
    },
    /// `receiver.method(args...)`, or `method(args...)` when `receiver` is `None`
    /// (extension style: `args[0]` supplies the receiver).
    MethodCall {
        receiver: Option<Box<PathExpr>>,
        method: MethodId,
        args: Vec<PathExpr>,
    },
    /// `param => body`. Only valid as the second argument of an extension call.
    Lambda(LambdaExpr),
}

/// A single-parameter predicate or selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaExpr {
    pub param: String,
    pub param_ty: DeclaredType,
    pub body: Box<PathExpr>,
}

impl LambdaExpr {
    pub fn new(param: impl Into<String>, param_ty: DeclaredType, body: PathExpr) -> Self {
        Self {
            param: param.into(),
            param_ty,
            body: Box::new(body),
        }
    }

    /// `(param_ty) -> body type`
    pub fn declared_type(&self) -> DeclaredType {
        DeclaredType::Function(
            vec![self.param_ty.clone()],
            Box::new(self.body.declared_type()),
        )
    }
}

impl PathExpr {
    /// The root parameter (or a lambda parameter, inside a lambda body).
    pub fn parameter(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self::Parameter {
            name: name.into(),
            ty,
        }
    }

    /// A constant typed by its literal kind.
    pub fn constant(value: impl Into<Literal>) -> Self {
        let value = value.into();
        let ty = value.natural_type();
        Self::Constant { value, ty }
    }

    /// A constant with an explicit declared type (e.g. a typed `null`).
    pub fn typed_constant(value: Literal, ty: DeclaredType) -> Self {
        Self::Constant { value, ty }
    }

    /// `self.name`
    pub fn member(self, name: impl Into<String>, ty: DeclaredType) -> Self {
        Self::MemberAccess {
            target: Box::new(self),
            member: MemberId::new(name, ty),
        }
    }

    /// `self.name(args...)`. Parameter types are taken from the arguments.
    pub fn call(self, name: impl Into<String>, args: Vec<PathExpr>, ret: DeclaredType) -> Self {
        let params = args.iter().map(PathExpr::declared_type).collect();
        Self::MethodCall {
            receiver: Some(Box::new(self)),
            method: MethodId::new(name, params, ret),
            args,
        }
    }

    /// `name(self)`, called extension style.
    pub fn extension(self, name: impl Into<String>, ret: DeclaredType) -> Self {
        let params = vec![self.declared_type()];
        Self::MethodCall {
            receiver: None,
            method: MethodId::new(name, params, ret),
            args: vec![self],
        }
    }

    /// `name(self, lambda)`, called extension style.
    pub fn extension_with(
        self,
        name: impl Into<String>,
        lambda: LambdaExpr,
        ret: DeclaredType,
    ) -> Self {
        let params = vec![self.declared_type(), lambda.declared_type()];
        Self::MethodCall {
            receiver: None,
            method: MethodId::new(name, params, ret),
            args: vec![self, PathExpr::Lambda(lambda)],
        }
    }

    /// The static type of this node, independent of any evaluation.
    pub fn declared_type(&self) -> DeclaredType {
        match self {
            Self::Constant { ty, .. } | Self::Parameter { ty, .. } => ty.clone(),
            Self::MemberAccess { member, .. } => member.ty.clone(),
            Self::MethodCall { method, .. } => method.ret.clone(),
            Self::Lambda(lambda) => lambda.declared_type(),
        }
    }

    /// Short name of the node kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
            Self::Parameter { .. } => "parameter",
            Self::MemberAccess { .. } => "member access",
            Self::MethodCall { receiver: Some(_), .. } => "method call",
            Self::MethodCall { receiver: None, .. } => "extension call",
            Self::Lambda(_) => "lambda",
        }
    }

    /// Load a path description from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize this path description to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
