//! The three value bags an interpreter evaluates against.
//!
//! Lookups resolve `overrides`, then `inputs`, then `outputs`; the first
//! hit wins. Only `outputs` is ever written, by `set`.
//!
//! # Paths
//!
//! A name is first tried as a literal key. If that misses and the name
//! contains `.`, it is walked segment by segment: maps by key, arrays by
//! position, host objects by field (following host indirections). Writes
//! to a dotted path create the intermediate maps they need.

use planout_value::{deref_host, index_host, path_conflict, EvalError, Value, ValueMap};

/// Variable storage for one interpreter.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    overrides: ValueMap,
    inputs: ValueMap,
    outputs: ValueMap,
}

impl Environment {
    pub fn new(inputs: ValueMap, overrides: ValueMap) -> Self {
        Environment {
            overrides,
            inputs,
            outputs: ValueMap::default(),
        }
    }

    /// Resolve a name in override, input, output order.
    pub fn get(&self, name: &str) -> Option<Value> {
        delve(&self.overrides, name)
            .or_else(|| delve(&self.inputs, name))
            .or_else(|| delve(&self.outputs, name))
    }

    /// Write an output, creating intermediate maps for dotted paths.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        delve_create(&mut self.outputs, name, value)
    }

    pub fn has_override(&self, name: &str) -> bool {
        delve(&self.overrides, name).is_some()
    }

    pub fn overrides(&self) -> &ValueMap {
        &self.overrides
    }

    pub fn inputs(&self) -> &ValueMap {
        &self.inputs
    }

    pub fn outputs(&self) -> &ValueMap {
        &self.outputs
    }

    /// Swap in a new output map, returning the old one.
    pub(crate) fn replace_outputs(&mut self, outputs: ValueMap) -> ValueMap {
        std::mem::replace(&mut self.outputs, outputs)
    }

    pub fn into_outputs(self) -> ValueMap {
        self.outputs
    }
}

/// Path-aware lookup in a single map.
pub(crate) fn delve(map: &ValueMap, path: &str) -> Option<Value> {
    if let Some(value) = map.get(path) {
        return Some(value.clone());
    }
    let (head, rest) = path.split_once('.')?;
    let mut current = map.get(head)?.clone();
    for segment in rest.split('.') {
        current = step(deref_host(current), segment)?;
    }
    Some(current)
}

fn step(value: Value, segment: &str) -> Option<Value> {
    let position = segment.parse::<usize>().ok();
    match value {
        Value::Map(mut map) => map.remove(segment),
        Value::Seq(mut items) => match position {
            Some(i) if i < items.len() => Some(items.swap_remove(i)),
            _ => None,
        },
        Value::Host(host) => {
            let index = position.map_or_else(|| Value::from(segment), Value::from);
            index_host(host.as_ref(), &index)
        }
        _ => None,
    }
}

/// Path-aware write into a single map.
pub(crate) fn delve_create(map: &mut ValueMap, path: &str, value: Value) -> Result<(), EvalError> {
    if !path.contains('.') || map.contains_key(path) {
        map.insert(path.to_string(), value);
        return Ok(());
    }
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return Ok(());
    };
    let mut current = map;
    for segment in parents {
        let entry = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Map(ValueMap::default()));
        match entry {
            Value::Map(inner) => current = inner,
            _ => return Err(path_conflict(path)),
        }
    }
    current.insert((*last).to_string(), value);
    Ok(())
}
