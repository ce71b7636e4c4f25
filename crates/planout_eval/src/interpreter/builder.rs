//! `InterpreterBuilder` for configuring an [`Interpreter`].

use std::sync::Arc;

use planout_value::{Value, ValueMap};
use rustc_hash::FxHashMap;

use super::Interpreter;
use crate::environment::Environment;
use crate::operator::Operator;
use crate::stack::DEFAULT_MAX_DEPTH;

/// Builder for [`Interpreter`].
///
/// Only the tree is required. The salt defaults to the experiment name, so
/// an experiment that is never given an explicit salt is salted by its name.
#[must_use]
pub struct InterpreterBuilder {
    code: Arc<Value>,
    name: String,
    salt: Option<String>,
    inputs: ValueMap,
    overrides: ValueMap,
    outputs: ValueMap,
    operator_overrides: FxHashMap<String, Arc<dyn Operator>>,
    max_depth: usize,
}

impl InterpreterBuilder {
    /// Start from a parsed tree. An `Arc` lets many interpreters share one tree.
    pub fn new(code: impl Into<Arc<Value>>) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            salt: None,
            inputs: ValueMap::default(),
            overrides: ValueMap::default(),
            outputs: ValueMap::default(),
            operator_overrides: FxHashMap::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Experiment salt mixed into every random draw.
    pub fn salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Replace all inputs.
    pub fn inputs(mut self, inputs: ValueMap) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn input(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(name.into(), value.into());
        self
    }

    /// Replace all overrides.
    pub fn overrides(mut self, overrides: ValueMap) -> Self {
        self.overrides = overrides;
        self
    }

    /// Force a variable to a value regardless of what the tree computes.
    pub fn override_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// Outputs each run starts from.
    pub fn outputs(mut self, outputs: ValueMap) -> Self {
        self.outputs = outputs;
        self
    }

    /// Shadow an operator by name for this interpreter only.
    pub fn operator_override(
        mut self,
        name: impl Into<String>,
        operator: Arc<dyn Operator>,
    ) -> Self {
        self.operator_overrides.insert(name.into(), operator);
        self
    }

    /// Maximum nesting of `evaluate` calls before a run fails.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn build(self) -> Interpreter {
        let salt = self.salt.unwrap_or_else(|| self.name.clone());
        let mut env = Environment::new(self.inputs, self.overrides);
        env.replace_outputs(self.outputs.clone());
        Interpreter {
            name: self.name,
            salt,
            code: self.code,
            env,
            initial_outputs: self.outputs,
            evaluated: false,
            in_experiment: true,
            parameter_salt: String::new(),
            operator_overrides: self.operator_overrides,
            max_depth: self.max_depth,
            depth: 0,
        }
    }
}
