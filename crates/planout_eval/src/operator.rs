//! The `Operator` trait and the argument view operators receive.

use planout_value::{
    missing_key, type_mismatch, ControlAction, EvalError, EvalResult, Value, ValueMap,
};

use crate::interpreter::Interpreter;

/// One entry of the operator catalog.
///
/// The evaluator checks `required_keys` on the invocation node before
/// calling `execute`, so implementations can fetch required arguments
/// without re-validating their presence.
pub trait Operator: Send + Sync {
    /// The name trees use in their `"op"` key.
    fn name(&self) -> &'static str;

    /// Keys that must be present on the invocation node.
    fn required_keys(&self) -> &'static [&'static str];

    /// Keys the operator reads when present.
    fn optional_keys(&self) -> &'static [&'static str] {
        &[]
    }

    /// Evaluate the invocation.
    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult;
}

/// Read-only view of an operator invocation node.
#[derive(Clone, Copy, Debug)]
pub struct Invocation<'a> {
    op: &'a str,
    node: &'a ValueMap,
}

impl<'a> Invocation<'a> {
    pub fn new(op: &'a str, node: &'a ValueMap) -> Self {
        Invocation { op, node }
    }

    /// Operator name as written in the tree.
    pub fn op(&self) -> &'a str {
        self.op
    }

    /// The whole invocation node, including `"op"`.
    pub fn node(&self) -> &'a ValueMap {
        self.node
    }

    /// Unevaluated argument.
    pub fn get(&self, key: &str) -> Result<&'a Value, EvalError> {
        self.node.get(key).ok_or_else(|| missing_key(self.op, key))
    }

    pub fn get_opt(&self, key: &str) -> Option<&'a Value> {
        self.node.get(key)
    }

    /// Unevaluated argument that must be a string (variable names).
    pub fn literal_str(&self, key: &str) -> Result<&'a str, EvalError> {
        let value = self.get(key)?;
        value
            .as_str()
            .ok_or_else(|| type_mismatch(self.op, "string", value.type_name()))
    }

    /// Unevaluated argument that must be an array (lazily evaluated lists).
    pub fn literal_seq(&self, key: &str) -> Result<&'a [Value], EvalError> {
        let value = self.get(key)?;
        value
            .as_seq()
            .ok_or_else(|| type_mismatch(self.op, "array", value.type_name()))
    }

    /// Evaluate a required argument.
    pub fn eval(&self, key: &str, interp: &mut Interpreter) -> EvalResult {
        interp.evaluate(self.get(key)?)
    }

    /// Evaluate an optional argument if present.
    pub fn eval_opt(
        &self,
        key: &str,
        interp: &mut Interpreter,
    ) -> Result<Option<Value>, ControlAction> {
        match self.get_opt(key) {
            Some(node) => Ok(Some(interp.evaluate(node)?)),
            None => Ok(None),
        }
    }

    pub fn eval_number(&self, key: &str, interp: &mut Interpreter) -> Result<f64, ControlAction> {
        let value = self.eval(key, interp)?;
        Ok(self.number(&value)?)
    }

    pub fn eval_string(
        &self,
        key: &str,
        interp: &mut Interpreter,
    ) -> Result<String, ControlAction> {
        match self.eval(key, interp)? {
            Value::Str(s) => Ok(s),
            other => Err(self.mismatch("string", &other).into()),
        }
    }

    /// Evaluate a list argument. The node goes through the evaluator like any
    /// other argument, so `[{"op": "get", "var": "xs"}]` is the list `xs`.
    pub fn eval_list(
        &self,
        key: &str,
        interp: &mut Interpreter,
    ) -> Result<Vec<Value>, ControlAction> {
        match self.eval(key, interp)? {
            Value::Seq(items) => Ok(items),
            other => Err(self.mismatch("array", &other).into()),
        }
    }

    /// Evaluate a list argument and require every element to be a number.
    pub fn eval_numbers(
        &self,
        key: &str,
        interp: &mut Interpreter,
    ) -> Result<Vec<f64>, ControlAction> {
        let values = self.eval_list(key, interp)?;
        let numbers = values
            .iter()
            .map(|value| self.number(value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(numbers)
    }

    /// Require a number operand.
    pub fn number(&self, value: &Value) -> Result<f64, EvalError> {
        value
            .as_number()
            .ok_or_else(|| self.mismatch("number", value))
    }

    /// Type mismatch error attributed to this operator.
    #[cold]
    pub fn mismatch(&self, expected: &str, got: &Value) -> EvalError {
        type_mismatch(self.op, expected, got.type_name())
    }
}
