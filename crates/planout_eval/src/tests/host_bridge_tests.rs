//! Reading native data through `index` and dotted `get` paths.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use planout_value::{host_object, HostObject, Indirect, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::{experiment, tree};

#[derive(Debug)]
struct Inner {
    value: String,
}

#[derive(Debug)]
struct Outer {
    inner: Arc<Inner>,
    scores: Vec<i64>,
    labels: HashMap<String, String>,
    internal_id: u64,
}

host_object!(Inner { value });
host_object!(Outer { inner, scores, labels });

fn outer_struct() -> Outer {
    let mut labels = HashMap::new();
    labels.insert("tier".to_string(), "gold".to_string());
    Outer {
        inner: Arc::new(Inner {
            value: "foo".to_string(),
        }),
        scores: vec![3, 5, 8],
        labels,
        internal_id: 99,
    }
}

fn outer() -> Value {
    Value::host(outer_struct())
}

fn index(base: serde_json::Value, key: serde_json::Value) -> serde_json::Value {
    json!({"op": "index", "base": base, "index": key})
}

fn get(var: &str) -> serde_json::Value {
    json!({"op": "get", "var": var})
}

#[test]
fn test_internal_id_is_native_only() {
    let native = outer_struct();
    assert_eq!(native.internal_id, 99);
    assert_eq!(native.type_name(), "Outer");
    assert_eq!(native.get_field("internal_id"), None);
}

fn eval_with_outer(node: serde_json::Value) -> Value {
    let mut interp = experiment(json!(null)).input("outer", outer()).build();
    interp.evaluate(&tree(node)).unwrap()
}

#[test]
fn test_nested_field_access() {
    let node = index(index(get("outer"), json!("inner")), json!("value"));
    assert_eq!(eval_with_outer(node), Value::from("foo"));
}

#[test]
fn test_nested_field_through_dotted_get() {
    assert_eq!(
        eval_with_outer(get("outer.inner.value")),
        Value::from("foo")
    );
}

#[test]
fn test_intermediate_host_stays_a_handle() {
    let Value::Host(inner) = eval_with_outer(index(get("outer"), json!("inner"))) else {
        panic!("expected a host handle");
    };
    assert_eq!(inner.type_name(), "Inner");
}

#[test]
fn test_array_in_host() {
    let node = index(index(get("outer"), json!("scores")), json!(1));
    assert_eq!(eval_with_outer(node), Value::from(5));
    assert_eq!(eval_with_outer(get("outer.scores.2")), Value::from(8));
    assert_eq!(
        eval_with_outer(index(index(get("outer"), json!("scores")), json!(9))),
        Value::Null
    );
    assert_eq!(
        eval_with_outer(json!({"op": "length", "values": index(get("outer"), json!("scores"))})),
        Value::from(3)
    );
}

#[test]
fn test_map_in_host() {
    let node = index(index(get("outer"), json!("labels")), json!("tier"));
    assert_eq!(eval_with_outer(node), Value::from("gold"));
    assert_eq!(
        eval_with_outer(get("outer.labels.tier")),
        Value::from("gold")
    );
    assert_eq!(
        eval_with_outer(index(index(get("outer"), json!("labels")), json!("missing"))),
        Value::Null
    );
}

#[test]
fn test_unexposed_fields_are_null() {
    assert_eq!(
        eval_with_outer(index(get("outer"), json!("internal_id"))),
        Value::Null
    );
    assert_eq!(
        eval_with_outer(index(get("outer"), json!("Inner"))),
        Value::Null
    );
    let interp = experiment(json!(null)).input("outer", outer()).build();
    assert_eq!(interp.get("outer.internal_id"), None);
}

#[test]
fn test_indirection_is_followed() {
    let pointer = Value::host(Indirect::new(Value::host(Indirect::new(outer()))));
    let mut interp = experiment(json!(null)).input("ptr", pointer).build();
    let node = tree(index(index(get("ptr"), json!("inner")), json!("value")));
    assert_eq!(interp.evaluate(&node), Ok(Value::from("foo")));
    assert_eq!(interp.get("ptr.inner.value"), Some(Value::from("foo")));
}

#[test]
fn test_native_collections_as_hosts() {
    let mut table = BTreeMap::new();
    table.insert("a".to_string(), 1.5);
    let mut interp = experiment(json!(null))
        .input("list", Value::host(vec!["x".to_string(), "y".to_string()]))
        .input("table", Value::host(table))
        .build();
    assert_eq!(
        interp.evaluate(&tree(index(get("list"), json!(1)))),
        Ok(Value::from("y"))
    );
    assert_eq!(
        interp.evaluate(&tree(index(get("table"), json!("a")))),
        Ok(Value::Number(1.5))
    );
}

#[test]
fn test_host_field_feeds_randomization() {
    let code = json!({"op": "set", "var": "x", "value": {
        "op": "uniformChoice", "choices": [1, 2], "unit": get("user.id")
    }});

    #[derive(Debug)]
    struct User {
        id: String,
    }
    host_object!(User { id });

    let mut by_host = experiment(code.clone())
        .salt("s1")
        .input("user", Value::host(User { id: "42".to_string() }))
        .build();
    let mut by_map = experiment(code)
        .salt("s1")
        .input("user", Value::from(json!({"id": "42"})))
        .build();
    assert_eq!(by_host.run().unwrap(), by_map.run().unwrap());
    assert_eq!(by_host.outputs().get("x"), Some(&Value::from(1)));
}
