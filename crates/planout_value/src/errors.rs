//! Error types for tree evaluation.
//!
//! `EvalErrorKind` carries the structured category, `EvalError` pairs it with
//! the rendered message. Operators build errors through the factory functions
//! at the bottom of this module rather than constructing kinds directly.
//!
//! Early termination through `return` is not an error. It travels up the
//! evaluator as `ControlAction::Return`, next to `ControlAction::Error`, so
//! every recursive call propagates both with a single `?`.

use std::fmt;

use crate::value::Value;

/// Result of evaluating a node.
pub type EvalResult = Result<Value, ControlAction>;

/// Signals that unwind the evaluator up to `Interpreter::run`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlAction {
    /// `return` was evaluated; stop walking the tree and report success.
    Return { in_experiment: bool },
    /// The run failed.
    Error(EvalError),
}

impl ControlAction {
    /// The error carried by this action, if it is one.
    pub fn into_error(self) -> Option<EvalError> {
        match self {
            ControlAction::Error(err) => Some(err),
            ControlAction::Return { .. } => None,
        }
    }
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(err: EvalError) -> Self {
        ControlAction::Error(err)
    }
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Malformed invocation
    MissingKey { op: String, key: String },

    // Type/Operator
    TypeMismatch {
        op: String,
        expected: String,
        got: String,
    },
    IncomparableTypes { left: String, right: String },
    InvalidArgument { op: String, message: String },

    // Arithmetic
    DivisionByZero,
    ModuloByZero,

    // Environment
    UndefinedVariable { name: String },
    PathConflict { path: String },

    // Resource
    DepthLimitExceeded { limit: usize },

    /// Catch-all for errors raised by operator overrides.
    Custom { message: String },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey { op, key } => write!(f, "{op}: missing required key '{key}'"),
            Self::TypeMismatch { op, expected, got } => {
                write!(f, "{op}: expected {expected}, got {got}")
            }
            Self::IncomparableTypes { left, right } => {
                write!(f, "cannot compare {left} with {right}")
            }
            Self::InvalidArgument { op, message } => write!(f, "{op}: {message}"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::UndefinedVariable { name } => write!(f, "no such variable: {name}"),
            Self::PathConflict { path } => {
                write!(f, "cannot write '{path}': an intermediate value is not a map")
            }
            Self::DepthLimitExceeded { limit } => {
                write!(f, "evaluation depth limit of {limit} exceeded")
            }
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// An evaluation failure. Aborts the whole run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable message, equal to `kind.to_string()` for factory-built errors.
    pub message: String,
}

impl EvalError {
    /// Create an error with just a message (`Custom` kind).
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Factory functions

#[cold]
pub fn missing_key(op: &str, key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingKey {
        op: op.to_string(),
        key: key.to_string(),
    })
}

#[cold]
pub fn type_mismatch(op: &str, expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        op: op.to_string(),
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn incomparable_types(left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IncomparableTypes {
        left: left.to_string(),
        right: right.to_string(),
    })
}

#[cold]
pub fn invalid_argument(op: &str, message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument {
        op: op.to_string(),
        message: message.into(),
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn path_conflict(path: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PathConflict {
        path: path.to_string(),
    })
}

#[cold]
pub fn depth_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DepthLimitExceeded { limit })
}
