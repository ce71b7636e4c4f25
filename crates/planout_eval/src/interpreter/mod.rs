//! Tree-walking interpreter for PlanOut experiment trees.
//!
//! # Evaluation rules
//!
//! - A map whose string `"op"` names a known operator is an invocation. The
//!   operator's required keys are checked, then it executes. Per-interpreter
//!   operator overrides win over the built-in catalog.
//! - An array holding exactly one invocation evaluates to that invocation's
//!   result. Any other array evaluates element-wise, left to right.
//! - Everything else, including maps with an unknown `"op"`, is a literal.
//!
//! # Runs
//!
//! A run evaluates the whole tree once against a fresh copy of the initial
//! outputs. `return` ends a run successfully; an error ends it and restores
//! the outputs the interpreter had before the run started. A successful run
//! is cached until the next forced [`Interpreter::run`].

mod builder;

pub use builder::InterpreterBuilder;

use std::sync::Arc;

use planout_value::{
    depth_limit_exceeded, missing_key, ControlAction, EvalError, EvalResult, Value, ValueMap,
};
use rustc_hash::FxHashMap;

use crate::environment::Environment;
use crate::operator::{Invocation, Operator};
use crate::registry::OperatorRegistry;
use crate::stack::ensure_sufficient_stack;

/// Evaluates one experiment definition for one set of inputs.
pub struct Interpreter {
    name: String,
    salt: String,
    code: Arc<Value>,
    env: Environment,
    /// Outputs every run starts from.
    initial_outputs: ValueMap,
    evaluated: bool,
    in_experiment: bool,
    /// Name of the variable the innermost `set` is assigning.
    parameter_salt: String,
    operator_overrides: FxHashMap<String, Arc<dyn Operator>>,
    max_depth: usize,
    depth: usize,
}

impl Interpreter {
    /// Evaluate the tree, discarding any cached result.
    pub fn run(&mut self) -> Result<&ValueMap, EvalError> {
        self.run_with(true)
    }

    /// Evaluate the tree unless a previous run already succeeded.
    pub fn run_cached(&mut self) -> Result<&ValueMap, EvalError> {
        self.run_with(false)
    }

    #[tracing::instrument(level = "debug", skip(self), fields(experiment = %self.name))]
    fn run_with(&mut self, force: bool) -> Result<&ValueMap, EvalError> {
        if self.evaluated && !force {
            tracing::debug!("returning cached outputs");
            return Ok(self.env.outputs());
        }

        let previous_outputs = self.env.replace_outputs(self.initial_outputs.clone());
        let previous_in_experiment = std::mem::replace(&mut self.in_experiment, true);
        self.parameter_salt.clear();
        self.depth = 0;

        let code = Arc::clone(&self.code);
        match self.evaluate(&code) {
            Ok(_) => {}
            Err(ControlAction::Return { in_experiment }) => {
                tracing::debug!(in_experiment, "early return");
                self.in_experiment = in_experiment;
            }
            Err(ControlAction::Error(err)) => {
                tracing::debug!(error = %err, "run failed, restoring outputs");
                self.env.replace_outputs(previous_outputs);
                self.in_experiment = previous_in_experiment;
                return Err(err);
            }
        }

        self.evaluated = true;
        Ok(self.env.outputs())
    }

    /// Evaluate one node.
    ///
    /// Operators call this for their arguments. Each call counts against the
    /// depth limit.
    pub fn evaluate(&mut self, node: &Value) -> EvalResult {
        if self.depth >= self.max_depth {
            return Err(depth_limit_exceeded(self.max_depth).into());
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.evaluate_inner(node));
        self.depth -= 1;
        result
    }

    fn evaluate_inner(&mut self, node: &Value) -> EvalResult {
        match node {
            Value::Map(map) => {
                if let Some((op, operator)) = self.invocation(map) {
                    return self.dispatch(operator.as_ref(), op, map);
                }
                Ok(node.clone())
            }
            Value::Seq(items) => {
                if let [only @ Value::Map(map)] = items.as_slice() {
                    if self.invocation(map).is_some() {
                        return self.evaluate(only);
                    }
                }
                items
                    .iter()
                    .map(|item| self.evaluate(item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Seq)
            }
            _ => Ok(node.clone()),
        }
    }

    /// The operator a map invokes, if it is an invocation at all.
    fn invocation<'n>(&self, map: &'n ValueMap) -> Option<(&'n str, Arc<dyn Operator>)> {
        let op = map.get("op")?.as_str()?;
        self.lookup_operator(op).map(|operator| (op, operator))
    }

    fn lookup_operator(&self, name: &str) -> Option<Arc<dyn Operator>> {
        self.operator_overrides
            .get(name)
            .or_else(|| OperatorRegistry::builtin().get(name))
            .cloned()
    }

    fn dispatch(&mut self, operator: &dyn Operator, op: &str, node: &ValueMap) -> EvalResult {
        if let Some(key) = operator
            .required_keys()
            .iter()
            .find(|key| !node.contains_key(**key))
        {
            return Err(missing_key(op, key).into());
        }
        tracing::trace!(op, "dispatch");
        operator.execute(&Invocation::new(op, node), self)
    }

    /// Resolve a variable through overrides, inputs, then outputs.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.env.get(name)
    }

    pub fn has_override(&self, name: &str) -> bool {
        self.env.has_override(name)
    }

    /// Write an output variable.
    pub fn set_output(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        self.env.set(name, value)
    }

    pub fn parameter_salt(&self) -> &str {
        &self.parameter_salt
    }

    pub fn set_parameter_salt(&mut self, salt: &str) {
        salt.clone_into(&mut self.parameter_salt);
    }

    /// Whether the last run left the unit in the experiment.
    pub fn in_experiment(&self) -> bool {
        self.in_experiment
    }

    pub fn outputs(&self) -> &ValueMap {
        self.env.outputs()
    }

    pub fn into_outputs(self) -> ValueMap {
        self.env.into_outputs()
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut overrides: Vec<_> = self.operator_overrides.keys().collect();
        overrides.sort();
        f.debug_struct("Interpreter")
            .field("name", &self.name)
            .field("salt", &self.salt)
            .field("evaluated", &self.evaluated)
            .field("in_experiment", &self.in_experiment)
            .field("outputs", self.env.outputs())
            .field("operator_overrides", &overrides)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
