use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use planout_value::EvalErrorKind;
use pretty_assertions::assert_eq;
use serde_json::json;

fn tree(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn interpreter(json: serde_json::Value) -> Interpreter {
    InterpreterBuilder::new(tree(json)).name("test").build()
}

fn eval(json: serde_json::Value) -> EvalResult {
    let node = tree(json);
    interpreter(json!(null)).evaluate(&node)
}

/// Counts invocations; fails once the count passes `fail_after`.
struct Counting {
    calls: Arc<AtomicUsize>,
    fail_after: usize,
}

impl Operator for Counting {
    fn name(&self) -> &'static str {
        "count"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[]
    }

    fn execute(&self, _args: &Invocation<'_>, _interp: &mut Interpreter) -> EvalResult {
        let calls = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if calls > self.fail_after {
            return Err(EvalError::new("count exhausted").into());
        }
        Ok(Value::from(calls))
    }
}

#[test]
fn test_scalars_are_literals() {
    assert_eq!(eval(json!(3)), Ok(Value::from(3)));
    assert_eq!(eval(json!("a")), Ok(Value::from("a")));
    assert_eq!(eval(json!(null)), Ok(Value::Null));
}

#[test]
fn test_unknown_op_is_literal() {
    let node = json!({"op": "frobnicate", "x": {"op": "get", "var": "missing"}});
    assert_eq!(eval(node.clone()), Ok(tree(node)));
}

#[test]
fn test_plain_map_is_not_walked() {
    let node = json!({"a": {"op": "sum", "values": [1, 2]}});
    assert_eq!(eval(node.clone()), Ok(tree(node)));
}

#[test]
fn test_single_invocation_list_collapses() {
    assert_eq!(
        eval(json!([{"op": "sum", "values": [1, 2]}])),
        Ok(Value::from(3))
    );
}

#[test]
fn test_other_lists_evaluate_elementwise() {
    assert_eq!(
        eval(json!([{"op": "sum", "values": [1, 2]}, {"op": "not", "value": true}])),
        Ok(Value::seq(vec![Value::from(3), Value::Bool(false)]))
    );
    assert_eq!(eval(json!([7])), Ok(Value::seq(vec![Value::from(7)])));
    assert_eq!(eval(json!([])), Ok(Value::seq(Vec::new())));
}

#[test]
fn test_missing_required_key() {
    let err = eval(json!({"op": "set", "var": "x"}))
        .unwrap_err()
        .into_error()
        .unwrap();
    assert_eq!(
        err.kind,
        EvalErrorKind::MissingKey {
            op: "set".to_string(),
            key: "value".to_string(),
        }
    );
    assert_eq!(err.message, "set: missing required key 'value'");
}

#[test]
fn test_depth_limit() {
    let mut node = json!(true);
    for _ in 0..20 {
        node = json!({"op": "not", "value": node});
    }
    let mut interp = InterpreterBuilder::new(tree(node.clone()))
        .max_depth(10)
        .build();
    let err = interp.run().unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DepthLimitExceeded { limit: 10 });

    let mut interp = InterpreterBuilder::new(tree(node)).build();
    assert!(interp.run().is_ok());
}

#[test]
fn test_depth_resets_between_evaluations() {
    let mut interp = InterpreterBuilder::new(Value::Null).max_depth(3).build();
    let node = tree(json!({"op": "not", "value": {"op": "not", "value": 1}}));
    for _ in 0..5 {
        assert_eq!(interp.evaluate(&node), Ok(Value::Bool(true)));
    }
}

#[test]
fn test_salt_defaults_to_name() {
    let interp = InterpreterBuilder::new(Value::Null).name("exp").build();
    assert_eq!(interp.salt(), "exp");

    let interp = InterpreterBuilder::new(Value::Null)
        .name("exp")
        .salt("other")
        .build();
    assert_eq!(interp.name(), "exp");
    assert_eq!(interp.salt(), "other");
}

#[test]
fn test_initial_outputs_are_kept() {
    let mut initial = ValueMap::default();
    initial.insert("a".to_string(), Value::from(1));
    let mut interp = InterpreterBuilder::new(tree(json!({"op": "set", "var": "b", "value": 2})))
        .outputs(initial)
        .build();
    let outputs = interp.run().unwrap();
    assert_eq!(outputs.get("a"), Some(&Value::from(1)));
    assert_eq!(outputs.get("b"), Some(&Value::from(2)));
}

#[test]
fn test_run_cached_skips_evaluation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counting = Arc::new(Counting {
        calls: Arc::clone(&calls),
        fail_after: usize::MAX,
    });
    let code = tree(json!({"op": "set", "var": "n", "value": {"op": "count"}}));
    let mut interp = InterpreterBuilder::new(code)
        .operator_override("count", counting)
        .build();

    assert_eq!(interp.run_cached().unwrap().get("n"), Some(&Value::from(1)));
    assert_eq!(interp.run_cached().unwrap().get("n"), Some(&Value::from(1)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(interp.run().unwrap().get("n"), Some(&Value::from(2)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_failed_run_restores_outputs() {
    let counting = Arc::new(Counting {
        calls: Arc::new(AtomicUsize::new(0)),
        fail_after: 1,
    });
    let code = tree(json!({"op": "seq", "seq": [
        {"op": "set", "var": "before", "value": "second"},
        {"op": "set", "var": "n", "value": {"op": "count"}}
    ]}));
    let mut interp = InterpreterBuilder::new(code)
        .operator_override("count", counting)
        .build();

    let first = interp.run().unwrap().clone();
    assert_eq!(first.get("n"), Some(&Value::from(1)));

    let err = interp.run().unwrap_err();
    assert_eq!(err.message, "count exhausted");
    assert_eq!(interp.outputs(), &first);

    // The cached success survives the failed forced run.
    assert_eq!(interp.run_cached().unwrap(), &first);
}

#[test]
fn test_failed_first_run_leaves_no_outputs() {
    let mut interp = interpreter(json!({"op": "seq", "seq": [
        {"op": "set", "var": "x", "value": 1},
        {"op": "get", "var": "nope"}
    ]}));
    let err = interp.run().unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "nope".to_string()
        }
    );
    assert!(interp.outputs().is_empty());
}

#[test]
fn test_operator_override_shadows_builtin() {
    let counting = Arc::new(Counting {
        calls: Arc::new(AtomicUsize::new(0)),
        fail_after: usize::MAX,
    });
    let mut interp = InterpreterBuilder::new(Value::Null)
        .operator_override("sum", counting)
        .build();
    let node = tree(json!({"op": "sum", "values": [10, 20]}));
    assert_eq!(interp.evaluate(&node), Ok(Value::from(1)));

    // Other interpreters still see the built-in.
    assert_eq!(
        interpreter(json!(null)).evaluate(&node),
        Ok(Value::from(30))
    );
}

#[test]
fn test_return_sets_in_experiment() {
    let mut interp = interpreter(json!({"op": "seq", "seq": [
        {"op": "set", "var": "x", "value": 1},
        {"op": "return", "value": false},
        {"op": "set", "var": "y", "value": 2}
    ]}));
    let outputs = interp.run().unwrap();
    assert_eq!(outputs.get("x"), Some(&Value::from(1)));
    assert_eq!(outputs.get("y"), None);
    assert!(!interp.in_experiment());
}

#[test]
fn test_in_experiment_defaults_true() {
    let mut interp = interpreter(json!({"op": "set", "var": "x", "value": 1}));
    assert!(interp.in_experiment());
    interp.run().unwrap();
    assert!(interp.in_experiment());
}

#[test]
fn test_forced_rerun_resets_in_experiment() {
    let counting = Arc::new(Counting {
        calls: Arc::new(AtomicUsize::new(0)),
        fail_after: usize::MAX,
    });
    // Only the first run returns early.
    let code = tree(json!({"op": "cond", "cond": [{
        "if": {"op": "equals", "left": {"op": "count"}, "right": 1},
        "then": {"op": "return", "value": false}
    }]}));
    let mut interp = InterpreterBuilder::new(code)
        .operator_override("count", counting)
        .build();
    interp.run().unwrap();
    assert!(!interp.in_experiment());
    interp.run().unwrap();
    assert!(interp.in_experiment());
}

#[test]
fn test_interpreter_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Interpreter>();
}

#[test]
fn test_into_outputs() {
    let mut interp = interpreter(json!({"op": "set", "var": "a.b", "value": 1}));
    interp.run().unwrap();
    let outputs = interp.into_outputs();
    assert_eq!(
        outputs.get("a"),
        Some(&Value::map_from([("b", Value::from(1))]))
    );
}
