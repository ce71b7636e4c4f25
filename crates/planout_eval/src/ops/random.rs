//! Deterministic randomization operators.
//!
//! Each operator hashes its unit under a salt built from the experiment salt
//! and either its own `salt` argument or the name of the variable being set.
//! See [`crate::random`] for the construction.

use planout_value::{invalid_argument, ControlAction, EvalResult, Value};

use crate::interpreter::Interpreter;
use crate::operator::{Invocation, Operator};
use crate::random::{unit_values, RandomSource};

const RANDOM_OPTIONAL: &[&str] = &["salt", "full_salt"];

/// Salt and units resolved for one random invocation.
struct RandomCall {
    source: RandomSource,
    units: Vec<Value>,
}

impl RandomCall {
    /// Resolve the salt and evaluate `unit`.
    ///
    /// The parameter salt is read before any argument runs, so a nested `set`
    /// inside an argument cannot change which salt this call uses.
    fn prepare(args: &Invocation<'_>, interp: &mut Interpreter) -> Result<Self, ControlAction> {
        let parameter_salt = interp.parameter_salt().to_owned();
        let source = if args.get_opt("full_salt").is_some() {
            RandomSource::with_full_salt(args.eval_string("full_salt", interp)?)
        } else {
            let salt = match args.get_opt("salt") {
                Some(_) => args.eval_string("salt", interp)?,
                None => parameter_salt,
            };
            RandomSource::new(interp.salt(), &salt)
        };
        let units = unit_values(args.eval("unit", interp)?);
        Ok(RandomCall { source, units })
    }

    fn draw(&self) -> f64 {
        self.source.draw(&self.units, None)
    }

    fn draw_with(&self, appended: &Value) -> f64 {
        self.source.draw(&self.units, Some(appended))
    }
}

/// Position `floor(draw * len)`, clamped for the `len - 1` edge.
fn pick(draw: f64, len: usize) -> usize {
    ((draw * len as f64) as usize).min(len.saturating_sub(1))
}

fn probability(
    op: &str,
    args: &Invocation<'_>,
    interp: &mut Interpreter,
) -> Result<f64, ControlAction> {
    let p = args.eval_number("p", interp)?;
    if !(0.0..=1.0).contains(&p) {
        let message = format!("p must be within [0, 1], got {p}");
        return Err(invalid_argument(op, message).into());
    }
    Ok(p)
}

pub(crate) struct UniformChoice;

impl Operator for UniformChoice {
    fn name(&self) -> &'static str {
        "uniformChoice"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["choices", "unit"]
    }

    fn optional_keys(&self) -> &'static [&'static str] {
        RANDOM_OPTIONAL
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let call = RandomCall::prepare(args, interp)?;
        let mut choices = args.eval_list("choices", interp)?;
        if choices.is_empty() {
            return Ok(Value::Seq(Vec::new()));
        }
        let index = pick(call.draw(), choices.len());
        Ok(choices.swap_remove(index))
    }
}

/// `bernoulliTrial`: `1` with probability `p`, else `0`.
pub(crate) struct BernoulliTrial;

impl Operator for BernoulliTrial {
    fn name(&self) -> &'static str {
        "bernoulliTrial"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["p", "unit"]
    }

    fn optional_keys(&self) -> &'static [&'static str] {
        RANDOM_OPTIONAL
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let call = RandomCall::prepare(args, interp)?;
        let p = probability(self.name(), args, interp)?;
        Ok(Value::from(i64::from(call.draw() < p)))
    }
}

/// `bernoulliFilter`: keeps each choice with probability `p`, drawing per
/// choice so the decisions are independent.
pub(crate) struct BernoulliFilter;

impl Operator for BernoulliFilter {
    fn name(&self) -> &'static str {
        "bernoulliFilter"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["p", "choices", "unit"]
    }

    fn optional_keys(&self) -> &'static [&'static str] {
        RANDOM_OPTIONAL
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let call = RandomCall::prepare(args, interp)?;
        let p = probability(self.name(), args, interp)?;
        let mut choices = args.eval_list("choices", interp)?;
        choices.retain(|choice| call.draw_with(choice) < p);
        Ok(Value::Seq(choices))
    }
}

pub(crate) struct WeightedChoice;

impl Operator for WeightedChoice {
    fn name(&self) -> &'static str {
        "weightedChoice"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["choices", "weights", "unit"]
    }

    fn optional_keys(&self) -> &'static [&'static str] {
        RANDOM_OPTIONAL
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let call = RandomCall::prepare(args, interp)?;
        let mut choices = args.eval_list("choices", interp)?;
        let weights = args.eval_numbers("weights", interp)?;
        if choices.len() != weights.len() {
            let message = format!("{} choices but {} weights", choices.len(), weights.len());
            return Err(invalid_argument(self.name(), message).into());
        }
        if let Some(weight) = weights.iter().find(|w| w.is_nan() || **w < 0.0) {
            let message = format!("weights must be non-negative, got {weight}");
            return Err(invalid_argument(self.name(), message).into());
        }
        let total: f64 = weights.iter().sum();
        if choices.is_empty() || total <= 0.0 {
            return Ok(Value::Seq(Vec::new()));
        }

        let stop = call.draw() * total;
        let mut cumulative = 0.0;
        let mut chosen = choices.len() - 1;
        for (i, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if stop < cumulative {
                chosen = i;
                break;
            }
        }
        Ok(choices.swap_remove(chosen))
    }
}

/// `randomInteger`: uniform over the inclusive range of truncated bounds.
pub(crate) struct RandomInteger;

impl Operator for RandomInteger {
    fn name(&self) -> &'static str {
        "randomInteger"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["min", "max", "unit"]
    }

    fn optional_keys(&self) -> &'static [&'static str] {
        RANDOM_OPTIONAL
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let call = RandomCall::prepare(args, interp)?;
        let min = args.eval_number("min", interp)?.trunc();
        let max = args.eval_number("max", interp)?.trunc();
        if max < min {
            let message = format!("max {max} is below min {min}");
            return Err(invalid_argument(self.name(), message).into());
        }
        let offset = (call.draw() * (max - min + 1.0)).floor();
        Ok(Value::Number((min + offset).min(max)))
    }
}

pub(crate) struct RandomFloat;

impl Operator for RandomFloat {
    fn name(&self) -> &'static str {
        "randomFloat"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["min", "max", "unit"]
    }

    fn optional_keys(&self) -> &'static [&'static str] {
        RANDOM_OPTIONAL
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let call = RandomCall::prepare(args, interp)?;
        let min = args.eval_number("min", interp)?;
        let max = args.eval_number("max", interp)?;
        Ok(Value::Number(call.source.uniform(min, max, &call.units, None)))
    }
}

/// `sample`: `draws` distinct choices by a partial Fisher-Yates shuffle.
/// Pick `i` hashes the unit extended with `i`.
pub(crate) struct Sample;

impl Operator for Sample {
    fn name(&self) -> &'static str {
        "sample"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["choices", "unit"]
    }

    fn optional_keys(&self) -> &'static [&'static str] {
        &["draws", "salt", "full_salt"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let call = RandomCall::prepare(args, interp)?;
        let mut choices = args.eval_list("choices", interp)?;
        let len = choices.len();
        let draws = match args.eval_opt("draws", interp)? {
            None => len,
            Some(value) => {
                let n = args.number(&value)?;
                match value.as_index() {
                    Some(draws) if draws <= len => draws,
                    _ => {
                        let message = format!("draws must be within 0..={len}, got {n}");
                        return Err(invalid_argument(self.name(), message).into());
                    }
                }
            }
        };

        for i in 0..draws {
            let draw = call.draw_with(&Value::from(i));
            let j = i + pick(draw, len - i);
            choices.swap(i, j);
        }
        choices.truncate(draws);
        Ok(Value::Seq(choices))
    }
}
