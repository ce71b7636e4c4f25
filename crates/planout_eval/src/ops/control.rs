//! Control flow, environment and literal operators.

use planout_value::{undefined_variable, ControlAction, EvalResult, Value};

use crate::interpreter::Interpreter;
use crate::operator::{Invocation, Operator};

/// `seq`: evaluate the body; sequencing is list evaluation.
pub(crate) struct Seq;

impl Operator for Seq {
    fn name(&self) -> &'static str {
        "seq"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["seq"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        args.eval("seq", interp)
    }
}

/// `return`: stop the whole run, recording whether the unit is in the experiment.
pub(crate) struct Return;

impl Operator for Return {
    fn name(&self) -> &'static str {
        "return"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["value"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let value = args.eval("value", interp)?;
        Err(ControlAction::Return {
            in_experiment: value.is_truthy(),
        })
    }
}

/// `set`: assign an output. The variable name becomes the parameter salt
/// for randomization inside `value`.
pub(crate) struct Set;

impl Operator for Set {
    fn name(&self) -> &'static str {
        "set"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["var", "value"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let var = args.literal_str("var")?;
        interp.set_parameter_salt(var);
        let value = args.eval("value", interp)?;
        interp.set_output(var, value)?;
        Ok(Value::Bool(true))
    }
}

pub(crate) struct Get;

impl Operator for Get {
    fn name(&self) -> &'static str {
        "get"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["var"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let var = args.literal_str("var")?;
        match interp.get(var) {
            Some(value) => Ok(value),
            None => Err(undefined_variable(var).into()),
        }
    }
}

/// `literal`: the `value` node, unevaluated.
pub(crate) struct Literal;

impl Operator for Literal {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["value"]
    }

    fn execute(&self, args: &Invocation<'_>, _interp: &mut Interpreter) -> EvalResult {
        Ok(args.get("value")?.clone())
    }
}

/// `cond`: first clause whose `if` is truthy. Falls through to `true`.
pub(crate) struct Cond;

impl Operator for Cond {
    fn name(&self) -> &'static str {
        "cond"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["cond"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        for clause in args.literal_seq("cond")? {
            let Value::Map(clause_node) = clause else {
                return Err(args.mismatch("map", clause).into());
            };
            let clause = Invocation::new(args.op(), clause_node);
            let then = clause.get("then")?;
            if clause.eval("if", interp)?.is_truthy() {
                return interp.evaluate(then);
            }
        }
        Ok(Value::Bool(true))
    }
}
