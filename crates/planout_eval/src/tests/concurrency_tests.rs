//! Independent interpreters running on many threads.

use std::sync::Arc;

use planout_value::{Value, ValueMap};
use pretty_assertions::assert_eq;
use rayon::prelude::*;
use serde_json::json;

use super::tree;
use crate::InterpreterBuilder;

fn assignments_named(code: &Arc<Value>, name: &str, unit: i64) -> ValueMap {
    let mut interp = InterpreterBuilder::new(Arc::clone(code))
        .name(name)
        .input("u", unit)
        .build();
    interp.run().cloned().unwrap()
}

fn assignments(code: &Arc<Value>, unit: i64) -> ValueMap {
    assignments_named(code, "parallel", unit)
}

#[test]
fn test_parallel_runs_match_sequential() {
    let code = Arc::new(tree(json!({"op": "seq", "seq": [
        {"op": "set", "var": "group", "value": {
            "op": "weightedChoice", "choices": ["a", "b"], "weights": [1, 3],
            "unit": {"op": "get", "var": "u"}
        }},
        {"op": "set", "var": "picks", "value": {
            "op": "sample", "choices": [1, 2, 3, 4], "draws": 2,
            "unit": {"op": "get", "var": "u"}
        }}
    ]})));

    let sequential: Vec<_> = (0..2000).map(|u| assignments(&code, u)).collect();
    let parallel: Vec<_> = (0..2000_i64)
        .into_par_iter()
        .map(|u| assignments(&code, u))
        .collect();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_interpreters_move_across_threads() {
    let code = Arc::new(tree(json!({"op": "set", "var": "x", "value": {
        "op": "randomInteger", "min": 0, "max": 99, "unit": {"op": "get", "var": "u"}
    }})));
    let interpreters: Vec<_> = (0..64_i64)
        .map(|u| {
            InterpreterBuilder::new(Arc::clone(&code))
                .name("moved")
                .input("u", u)
                .build()
        })
        .collect();
    let outputs: Vec<_> = interpreters
        .into_par_iter()
        .map(|mut interp| interp.run().cloned().unwrap())
        .collect();
    let expected: Vec<_> = (0..64)
        .map(|u| assignments_named(&code, "moved", u))
        .collect();
    assert_eq!(outputs, expected);
}
