//! Numeric operators. All operands must be numbers.

use std::cmp::Ordering;

use planout_value::{division_by_zero, invalid_argument, modulo_by_zero, EvalResult, Value};

use crate::interpreter::Interpreter;
use crate::operator::{Invocation, Operator};

pub(crate) struct Sum;

impl Operator for Sum {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["values"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let numbers = args.eval_numbers("values", interp)?;
        Ok(Value::Number(numbers.into_iter().sum()))
    }
}

pub(crate) struct Product;

impl Operator for Product {
    fn name(&self) -> &'static str {
        "product"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["values"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let numbers = args.eval_numbers("values", interp)?;
        Ok(Value::Number(numbers.into_iter().product()))
    }
}

pub(crate) struct Negative;

impl Operator for Negative {
    fn name(&self) -> &'static str {
        "negative"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["value"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        Ok(Value::Number(-args.eval_number("value", interp)?))
    }
}

/// `round`: each element, half away from zero.
pub(crate) struct Round;

impl Operator for Round {
    fn name(&self) -> &'static str {
        "round"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["values"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let numbers = args.eval_numbers("values", interp)?;
        let rounded = numbers.into_iter().map(|n| Value::Number(n.round()));
        Ok(Value::Seq(rounded.collect()))
    }
}

/// `%`: integer modulo on truncated operands. The sign follows the dividend.
pub(crate) struct Modulo;

impl Operator for Modulo {
    fn name(&self) -> &'static str {
        "%"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["left", "right"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let left = args.eval_number("left", interp)?.trunc() as i64;
        let right = args.eval_number("right", interp)?.trunc() as i64;
        if right == 0 {
            return Err(modulo_by_zero().into());
        }
        Ok(Value::from(left.wrapping_rem(right)))
    }
}

pub(crate) struct Divide;

impl Operator for Divide {
    fn name(&self) -> &'static str {
        "/"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["left", "right"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let left = args.eval_number("left", interp)?;
        let right = args.eval_number("right", interp)?;
        if right == 0.0 {
            return Err(division_by_zero().into());
        }
        Ok(Value::Number(left / right))
    }
}

/// `min` / `max`: extreme element by [`Value::compare`].
pub(crate) struct Extremum {
    pub(crate) name: &'static str,
    pub(crate) keep: Ordering,
}

impl Operator for Extremum {
    fn name(&self) -> &'static str {
        self.name
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["values"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let mut values = args.eval_list("values", interp)?.into_iter();
        let Some(mut best) = values.next() else {
            return Err(invalid_argument(self.name, "values must not be empty").into());
        };
        for value in values {
            if value.compare(&best)? == self.keep {
                best = value;
            }
        }
        Ok(best)
    }
}

pub(crate) const MIN: Extremum = Extremum {
    name: "min",
    keep: Ordering::Less,
};
pub(crate) const MAX: Extremum = Extremum {
    name: "max",
    keep: Ordering::Greater,
};
