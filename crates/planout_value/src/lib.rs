//! PlanOut Value - runtime value model for the PlanOut interpreter.
//!
//! This crate provides:
//! - The dynamic `Value` type flowing through evaluation
//! - The host object bridge (`HostObject`, `ToValue`, `host_object!`)
//! - Evaluation error types (`EvalError`, `EvalErrorKind`, `ControlAction`)
//! - The `serde_json` adapter for trees and inputs

mod errors;
mod host;
mod json;
mod value;

pub use errors::{ControlAction, EvalError, EvalErrorKind, EvalResult};
pub use host::{deref_host, index_host, HostObject, Indirect, ToValue, MAX_INDIRECTIONS};
pub use value::{HostRef, Value, ValueMap};

pub use errors::{
    depth_limit_exceeded, division_by_zero, incomparable_types, invalid_argument, missing_key,
    modulo_by_zero, path_conflict, type_mismatch, undefined_variable,
};
