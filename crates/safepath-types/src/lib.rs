//! Shared types for safepath.
//!
//! This crate defines the path AST, declared type descriptors, and the
//! runtime value model consumed and produced by the evaluator.

mod ty;
mod value;
pub mod ast;

pub use ast::{LambdaExpr, Literal, MemberId, MethodId, PathExpr};
pub use ty::DeclaredType;
pub use value::{ConversionError, FromValue, ObjectRef, SetValue, StructValue, Value};
