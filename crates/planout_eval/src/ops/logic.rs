//! Boolean and comparison operators.

use std::cmp::Ordering;

use planout_value::{EvalResult, Value};

use crate::interpreter::Interpreter;
use crate::operator::{Invocation, Operator};

/// `and`: stops at the first falsy element. An empty list is `false`.
pub(crate) struct And;

impl Operator for And {
    fn name(&self) -> &'static str {
        "and"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["values"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let values = args.literal_seq("values")?;
        if values.is_empty() {
            return Ok(Value::Bool(false));
        }
        for value in values {
            if !interp.evaluate(value)?.is_truthy() {
                return Ok(Value::Bool(false));
            }
        }
        Ok(Value::Bool(true))
    }
}

/// `or`: stops at the first truthy element.
pub(crate) struct Or;

impl Operator for Or {
    fn name(&self) -> &'static str {
        "or"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["values"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        for value in args.literal_seq("values")? {
            if interp.evaluate(value)?.is_truthy() {
                return Ok(Value::Bool(true));
            }
        }
        Ok(Value::Bool(false))
    }
}

pub(crate) struct Not;

impl Operator for Not {
    fn name(&self) -> &'static str {
        "not"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["value"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        Ok(Value::Bool(!args.eval("value", interp)?.is_truthy()))
    }
}

/// Binary comparison over [`Value::compare`].
pub(crate) struct Comparison {
    pub(crate) name: &'static str,
    pub(crate) holds: fn(Ordering) -> bool,
}

impl Operator for Comparison {
    fn name(&self) -> &'static str {
        self.name
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["left", "right"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let left = args.eval("left", interp)?;
        let right = args.eval("right", interp)?;
        let ordering = left.compare(&right)?;
        Ok(Value::Bool((self.holds)(ordering)))
    }
}

pub(crate) const EQUALS: Comparison = Comparison {
    name: "equals",
    holds: Ordering::is_eq,
};
pub(crate) const GREATER: Comparison = Comparison {
    name: ">",
    holds: Ordering::is_gt,
};
pub(crate) const GREATER_EQUAL: Comparison = Comparison {
    name: ">=",
    holds: Ordering::is_ge,
};
pub(crate) const LESS: Comparison = Comparison {
    name: "<",
    holds: Ordering::is_lt,
};
pub(crate) const LESS_EQUAL: Comparison = Comparison {
    name: "<=",
    holds: Ordering::is_le,
};
