use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::accessor::Accessor;
use crate::container::{Array, ContainerId, Object};
use crate::function::Function;

/// Largest integer an `f64` represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A dynamically typed value.
///
/// `Null` also stands for "absent": reading a missing field yields `Null`,
/// and every keyword that skips absent values treats the two the same.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Array(Array),
    Object(Object),
    Function(Function),
}

impl Value {
    /// Build an object value from `(key, value)` pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().collect())
    }

    /// Build an array value.
    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(items.into_iter().collect())
    }

    /// Wrap a closure as a function value.
    pub fn function(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Value::Function(Function::new(f))
    }

    /// True for `Null`, the absent value.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the runtime kind, as used in type-mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Identity of the container behind this value, if it is one.
    pub fn container_id(&self) -> Option<ContainerId> {
        match self {
            Value::Array(array) => Some(array.id()),
            Value::Object(object) => Some(object.id()),
            _ => None,
        }
    }

    /// Read a child. Missing children read as `Null`.
    pub fn get(&self, accessor: &Accessor) -> Value {
        match (self, accessor) {
            (Value::Object(object), Accessor::Key(key)) => object.get(key).unwrap_or_default(),
            (Value::Array(array), Accessor::Index(index)) => array.get(*index).unwrap_or_default(),
            _ => Value::Null,
        }
    }

    /// Shorthand for reading an object field.
    pub fn field(&self, key: &str) -> Value {
        self.as_object()
            .and_then(|object| object.get(key))
            .unwrap_or_default()
    }

    /// Write a child in place. Returns false when this value has no slot
    /// for `accessor`.
    pub fn set(&self, accessor: &Accessor, value: Value) -> bool {
        match (self, accessor) {
            (Value::Object(object), Accessor::Key(key)) => {
                object.insert(key.clone(), value);
                true
            }
            (Value::Array(array), Accessor::Index(index)) => array.set(*index, value),
            _ => false,
        }
    }

    /// Project into JSON. Datetimes become RFC 3339 strings, functions
    /// become `null`, and a container met again while it is being projected
    /// is cut off as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut active = Vec::new();
        self.to_json_inner(&mut active)
    }

    fn to_json_inner(&self, active: &mut Vec<ContainerId>) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null | Value::Function(_) => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => Json::String(s.clone()),
            Value::DateTime(dt) => Json::String(dt.to_rfc3339()),
            Value::Array(array) => {
                if active.contains(&array.id()) {
                    return Json::Null;
                }
                active.push(array.id());
                let items = array
                    .to_vec()
                    .iter()
                    .map(|item| item.to_json_inner(active))
                    .collect();
                active.pop();
                Json::Array(items)
            }
            Value::Object(object) => {
                if active.contains(&object.id()) {
                    return Json::Null;
                }
                active.push(object.id());
                let map = object
                    .entries()
                    .into_iter()
                    .map(|(key, value)| (key, value.to_json_inner(active)))
                    .collect();
                active.pop();
                Json::Object(map)
            }
        }
    }

    /// Copy this value with fresh storage for every container, keeping the
    /// shape of shared and cyclic references. Functions are shared.
    pub fn deep_clone(&self) -> Value {
        self.deep_clone_with_origins().0
    }

    /// Like [`Value::deep_clone`], also returning every copied container
    /// paired with the identity of its original. Holding the pairs keeps the
    /// copies alive, so their identities stay unique.
    pub fn deep_clone_with_origins(&self) -> (Value, Vec<(Value, ContainerId)>) {
        let mut copies = Vec::new();
        let copy = self.deep_clone_inner(&mut copies);
        let origins = copies.into_iter().map(|(original, copy)| (copy, original)).collect();
        (copy, origins)
    }

    fn deep_clone_inner(&self, copies: &mut Vec<(ContainerId, Value)>) -> Value {
        if let Some(id) = self.container_id() {
            if let Some((_, copy)) = copies.iter().find(|(original, _)| *original == id) {
                return copy.clone();
            }
        }

        match self {
            Value::Array(array) => {
                let copy = Array::new();
                copies.push((array.id(), Value::Array(copy.clone())));
                for item in array.to_vec() {
                    let item = item.deep_clone_inner(copies);
                    copy.push(item);
                }
                Value::Array(copy)
            }
            Value::Object(object) => {
                let copy = Object::new();
                copies.push((object.id(), Value::Object(copy.clone())));
                for (key, value) in object.entries() {
                    let value = value.deep_clone_inner(copies);
                    copy.insert(key, value);
                }
                Value::Object(copy)
            }
            other => other.clone(),
        }
    }

    fn eq_inner(&self, other: &Value, seen: &mut Vec<(ContainerId, ContainerId)>) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => {
                if a.ptr_eq(b) || seen.contains(&(a.id(), b.id())) {
                    return true;
                }
                let (left, right) = (a.to_vec(), b.to_vec());
                if left.len() != right.len() {
                    return false;
                }
                seen.push((a.id(), b.id()));
                let equal = left.iter().zip(&right).all(|(l, r)| l.eq_inner(r, seen));
                seen.pop();
                equal
            }
            (Value::Object(a), Value::Object(b)) => {
                if a.ptr_eq(b) || seen.contains(&(a.id(), b.id())) {
                    return true;
                }
                if a.len() != b.len() {
                    return false;
                }
                seen.push((a.id(), b.id()));
                let equal = a.entries().iter().all(|(key, value)| match b.get(key) {
                    Some(other) => value.eq_inner(&other, seen),
                    None => false,
                });
                seen.pop();
                equal
            }
            _ => false,
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl PartialEq for Value {
    /// Structural equality. Cyclic containers compare equal when their
    /// shapes agree up to the point of recurrence.
    fn eq(&self, other: &Self) -> bool {
        let mut seen = Vec::new();
        self.eq_inner(other, &mut seen)
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::DateTime(dt) => write!(f, "DateTime({})", dt.to_rfc3339()),
            Value::Array(array) => std::fmt::Debug::fmt(array, f),
            Value::Object(object) => std::fmt::Debug::fmt(object, f),
            Value::Function(function) => std::fmt::Debug::fmt(function, f),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::array(items.into_iter().map(Value::from)),
            Json::Object(map) => Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v)))),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from(json.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Array::from_vec(items))
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}
