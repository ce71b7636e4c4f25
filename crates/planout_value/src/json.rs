//! Adapter between `serde_json` documents and `Value`.
//!
//! Trees arrive as JSON; this is the only place the value model touches
//! the wire representation.

use serde_json::{Map as JsonMap, Number as JsonNumber, Value as Json};

use crate::value::Value;

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
            Json::Object(entries) => {
                let entries = entries.into_iter().map(|(k, v)| (k, Value::from(v)));
                Value::Map(entries.collect())
            }
        }
    }
}

impl From<&Value> for Json {
    fn from(value: &Value) -> Self {
        value.to_json()
    }
}

impl Value {
    /// Parse JSON text into a value.
    pub fn from_json_str(text: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str::<Json>(text).map(Value::from)
    }

    /// Render as a JSON document. Object keys come out sorted.
    ///
    /// Non-finite numbers become `null`; host handles become `"<TypeName>"`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::Str(s) => Json::String(s.clone()),
            Value::Seq(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => {
                let mut object = JsonMap::new();
                for (key, value) in map {
                    object.insert(key.clone(), value.to_json());
                }
                Json::Object(object)
            }
            Value::Host(host) => Json::String(format!("<{}>", host.type_name())),
        }
    }
}

fn number_to_json(n: f64) -> Json {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        Json::Number(JsonNumber::from(n as i64))
    } else {
        JsonNumber::from_f64(n).map_or(Json::Null, Json::Number)
    }
}
