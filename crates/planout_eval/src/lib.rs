//! PlanOut Eval - interpreter for PlanOut experiment definitions.
//!
//! This crate evaluates JSON-encoded experiment trees into parameter
//! assignments.
//!
//! # Architecture
//!
//! - `Interpreter`: tree walker, run state and memoization
//! - `InterpreterBuilder`: configuration surface (inputs, overrides, salt)
//! - `Environment`: override, input and output bags with dotted paths
//! - `Operator` / `OperatorRegistry`: the operator catalog
//! - `RandomSource`: hash-based deterministic draws
//!
//! # Re-exports
//!
//! Value and error types are re-exported from `planout_value`.

mod environment;
pub mod interpreter;
mod operator;
mod ops;
pub mod random;
mod registry;
mod stack;

pub use environment::Environment;
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use operator::{Invocation, Operator};
pub use random::RandomSource;
pub use registry::{OperatorRegistry, OperatorSignature};
pub use stack::{ensure_sufficient_stack, DEFAULT_MAX_DEPTH};

pub use planout_value::{
    ControlAction, EvalError, EvalErrorKind, EvalResult, HostObject, HostRef, Indirect, ToValue,
    Value, ValueMap,
};

#[cfg(test)]
mod tests;
