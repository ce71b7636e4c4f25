//! End-to-end tests that run whole experiment trees.

mod concurrency_tests;
mod host_bridge_tests;

use planout_value::{ControlAction, EvalError, Value, ValueMap};

use crate::{Interpreter, InterpreterBuilder};

pub(crate) fn tree(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// Interpreter named and salted `exp` over a JSON tree.
pub(crate) fn experiment(code: serde_json::Value) -> InterpreterBuilder {
    InterpreterBuilder::new(tree(code)).name("exp")
}

/// Run a tree with no inputs and return its outputs.
pub(crate) fn run(code: serde_json::Value) -> Result<ValueMap, EvalError> {
    let mut interp: Interpreter = experiment(code).build();
    interp.run().cloned()
}

/// Evaluate a single expression against an empty environment.
pub(crate) fn eval(node: serde_json::Value) -> Result<Value, EvalError> {
    let mut interp = experiment(serde_json::Value::Null).build();
    match interp.evaluate(&tree(node)) {
        Ok(value) => Ok(value),
        Err(ControlAction::Error(err)) => Err(err),
        Err(ControlAction::Return { .. }) => Err(EvalError::new("returned")),
    }
}
