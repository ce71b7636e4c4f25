//! Host object bridge.
//!
//! Lets the `index` operator read data out of native objects the caller
//! passes as inputs, without copying them into the value model first.
//! Each host type opts in by implementing `HostObject`; there is no runtime
//! introspection.
//!
//! # Field names
//!
//! Field names are matched exactly as written in the tree. Rust fields are
//! `snake_case`, so trees address a field `outer` as `"outer"`. The
//! [`host_object!`](crate::host_object) macro exposes exactly the listed
//! fields under their Rust identifiers; every other field is invisible and
//! indexes as absent.
//!
//! # Indirection
//!
//! A host object that only points at another value (a reference wrapper)
//! reports it through `deref_target`. [`deref_host`] follows such chains
//! before any indexing rule applies.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::value::{HostRef, Value};

/// Longest indirection chain `deref_host` will follow.
pub const MAX_INDIRECTIONS: usize = 64;

/// Capability interface for externally owned objects.
///
/// Every lookup returns `None` when the data is not exposed; the evaluator
/// turns that into `null` rather than an error.
pub trait HostObject: fmt::Debug + Send + Sync {
    /// Name reported in diagnostics and unit strings.
    fn type_name(&self) -> &str;

    /// A publicly exposed field.
    fn get_field(&self, _name: &str) -> Option<Value> {
        None
    }

    /// An element of a host sequence.
    fn get_index(&self, _index: usize) -> Option<Value> {
        None
    }

    /// An element of a host map.
    fn get_key(&self, _key: &Value) -> Option<Value> {
        None
    }

    /// Number of elements, for host sequences and maps.
    fn element_count(&self) -> Option<usize> {
        None
    }

    /// The value this object stands in for, if it is a pure indirection.
    fn deref_target(&self) -> Option<Value> {
        None
    }
}

/// Follow host indirections until a non-indirect value is reached.
///
/// Chains longer than `MAX_INDIRECTIONS` (including cycles) resolve to `null`.
pub fn deref_host(value: Value) -> Value {
    let mut current = value;
    for _ in 0..=MAX_INDIRECTIONS {
        let next = match &current {
            Value::Host(host) => host.deref_target(),
            _ => return current,
        };
        match next {
            Some(target) => current = target,
            None => return current,
        }
    }
    tracing::warn!(
        limit = MAX_INDIRECTIONS,
        "host indirection chain too long, treating it as absent"
    );
    Value::Null
}

/// Index a host object by a field name, position or key.
///
/// Strings try `get_field` first, numbers try `get_index` first; both fall
/// back to `get_key` so host maps are reachable with either key kind.
pub fn index_host(host: &dyn HostObject, index: &Value) -> Option<Value> {
    match index {
        Value::Str(name) => host.get_field(name).or_else(|| host.get_key(index)),
        Value::Number(_) => index
            .as_index()
            .and_then(|i| host.get_index(i))
            .or_else(|| host.get_key(index)),
        _ => host.get_key(index),
    }
}

/// A handle that forwards every lookup to another value.
///
/// Models a reference held by the host: indexing an `Indirect` behaves
/// exactly like indexing its target.
#[derive(Clone, Debug)]
pub struct Indirect {
    target: Value,
}

impl Indirect {
    pub fn new(target: impl Into<Value>) -> Self {
        Indirect {
            target: target.into(),
        }
    }
}

impl HostObject for Indirect {
    fn type_name(&self) -> &str {
        "Indirect"
    }

    fn deref_target(&self) -> Option<Value> {
        Some(self.target.clone())
    }
}

// Coercion of native data into values

/// Conversion of native data into a `Value`, used by host field accessors.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

macro_rules! impl_to_value_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Number(*self as f64)
                }
            }
        )*
    };
}

impl_to_value_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue, S> ToValue for HashMap<String, T, S> {
    fn to_value(&self) -> Value {
        let entries = self.iter().map(|(k, v)| (k.clone(), v.to_value()));
        Value::Map(entries.collect())
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        let entries = self.iter().map(|(k, v)| (k.clone(), v.to_value()));
        Value::Map(entries.collect())
    }
}

/// Nested host objects stay host handles.
impl<T: HostObject + 'static> ToValue for Arc<T> {
    fn to_value(&self) -> Value {
        let host: HostRef = self.clone();
        Value::Host(host)
    }
}

// Host sequences and maps passed opaquely

fn key_string(key: &Value) -> Option<String> {
    match key {
        Value::Str(s) => Some(s.clone()),
        Value::Number(_) => Some(key.unit_string()),
        _ => None,
    }
}

impl<T> HostObject for Vec<T>
where
    T: ToValue + fmt::Debug + Send + Sync,
{
    fn type_name(&self) -> &str {
        "Vec"
    }

    fn get_index(&self, index: usize) -> Option<Value> {
        self.get(index).map(ToValue::to_value)
    }

    fn element_count(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T> HostObject for HashMap<String, T>
where
    T: ToValue + fmt::Debug + Send + Sync,
{
    fn type_name(&self) -> &str {
        "HashMap"
    }

    fn get_key(&self, key: &Value) -> Option<Value> {
        key_string(key).and_then(|k| self.get(&k).map(ToValue::to_value))
    }

    fn element_count(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T> HostObject for BTreeMap<String, T>
where
    T: ToValue + fmt::Debug + Send + Sync,
{
    fn type_name(&self) -> &str {
        "BTreeMap"
    }

    fn get_key(&self, key: &Value) -> Option<Value> {
        key_string(key).and_then(|k| self.get(&k).map(ToValue::to_value))
    }

    fn element_count(&self) -> Option<usize> {
        Some(self.len())
    }
}

/// Implement `HostObject` for a struct, exposing the listed fields by name.
///
/// ```
/// use std::sync::Arc;
/// use planout_value::{host_object, HostObject, Value};
///
/// #[derive(Debug)]
/// struct Device {
///     platform: String,
///     build: u32,
///     secret: String,
/// }
///
/// host_object!(Device { platform, build });
///
/// let device = Device { platform: "ios".into(), build: 7, secret: "x".into() };
/// assert_eq!(device.get_field("platform"), Some(Value::from("ios")));
/// assert_eq!(device.get_field("secret"), None);
/// ```
#[macro_export]
macro_rules! host_object {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::HostObject for $ty {
            fn type_name(&self) -> &str {
                stringify!($ty)
            }

            fn get_field(&self, name: &str) -> ::core::option::Option<$crate::Value> {
                match name {
                    $(
                        stringify!($field) => ::core::option::Option::Some(
                            $crate::ToValue::to_value(&self.$field),
                        ),
                    )*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };
}
