//! Evaluation error types.

use safepath_types::ConversionError;
use thiserror::Error;

/// Errors that can occur while evaluating a path.
///
/// Absence along the path is not an error; it is handled by the default-value
/// policy. Every variant here aborts the evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The path contains a node that cannot appear where it was found.
    #[error("unsupported node: {0}")]
    UnsupportedNode(String),

    /// An extension-style call has an argument shape other than
    /// `(receiver)` or `(receiver, lambda)`.
    #[error("malformed extension call: {0}")]
    MalformedExtensionCall(String),

    /// The path nests deeper than the configured limit.
    #[error("path exceeds maximum depth of {0}")]
    DepthExceeded(usize),

    #[error("type `{type_name}` has no member `{member}`")]
    MemberNotFound { type_name: String, member: String },

    #[error("type `{type_name}` has no method `{method}`")]
    MethodNotFound { type_name: String, method: String },

    #[error("no extension function named `{0}`")]
    ExtensionNotFound(String),

    /// A host object or value type was never registered with the introspector.
    #[error("unregistered type: {0}")]
    UnregisteredType(String),

    /// Wrong argument count or argument kinds for a method.
    #[error("argument mismatch: {0}")]
    ArgumentMismatch(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// An invoked method or extension function reported a failure.
    #[error("invocation failed: {0}")]
    Invocation(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl EvalError {
    /// True when the error signals a malformed path description rather than
    /// a mismatch between the path and the objects it was evaluated against.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedNode(_) | Self::MalformedExtensionCall(_) | Self::DepthExceeded(_)
        )
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
