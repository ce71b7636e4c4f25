//! Collection construction and access.

use planout_value::{deref_host, index_host, EvalResult, Value, ValueMap};

use crate::interpreter::Interpreter;
use crate::operator::{Invocation, Operator};

/// `array`: whatever `values` evaluates to.
pub(crate) struct Array;

impl Operator for Array {
    fn name(&self) -> &'static str {
        "array"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["values"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        args.eval("values", interp)
    }
}

/// `map` / `dict`: every key but `op`, evaluated. Keys are visited in
/// sorted order so side effects inside values happen deterministically.
pub(crate) struct MapOp(pub(crate) &'static str);

impl Operator for MapOp {
    fn name(&self) -> &'static str {
        self.0
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let mut keys: Vec<&String> = args.node().keys().filter(|k| *k != "op").collect();
        keys.sort();
        let mut map = ValueMap::default();
        for key in keys {
            let value = args.eval(key, interp)?;
            map.insert(key.clone(), value);
        }
        Ok(Value::Map(map))
    }
}

/// `index`: element of an array, map or host object. Misses are `null`.
pub(crate) struct Index;

impl Operator for Index {
    fn name(&self) -> &'static str {
        "index"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["base", "index"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let base = deref_host(args.eval("base", interp)?);
        let index = args.eval("index", interp)?;
        let found = match &base {
            Value::Seq(items) => {
                if index.as_number().is_none() {
                    return Err(args.mismatch("number", &index).into());
                }
                index.as_index().and_then(|i| items.get(i).cloned())
            }
            Value::Map(map) => match &index {
                Value::Str(key) => map.get(key).cloned(),
                Value::Number(_) => map.get(&index.unit_string()).cloned(),
                _ => None,
            },
            Value::Host(host) => index_host(host.as_ref(), &index),
            _ => None,
        };
        Ok(found.map(deref_host).unwrap_or_default())
    }
}

/// `length`: element count of an array or host collection.
pub(crate) struct Length;

impl Operator for Length {
    fn name(&self) -> &'static str {
        "length"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["values"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let values = deref_host(args.eval("values", interp)?);
        let count = match &values {
            Value::Seq(items) => Some(items.len()),
            Value::Host(host) => host.element_count(),
            _ => None,
        };
        match count {
            Some(count) => Ok(Value::from(count)),
            None => Err(args.mismatch("array", &values).into()),
        }
    }
}

/// `coalesce`: the non-null elements, in order.
pub(crate) struct Coalesce;

impl Operator for Coalesce {
    fn name(&self) -> &'static str {
        "coalesce"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["values"]
    }

    fn execute(&self, args: &Invocation<'_>, interp: &mut Interpreter) -> EvalResult {
        let mut values = args.eval_list("values", interp)?;
        values.retain(|value| !value.is_null());
        Ok(Value::Seq(values))
    }
}
