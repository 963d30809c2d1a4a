//! Property sets crossing the dynamic-typing boundary
//!
//! The provider ecosystem is dynamically typed; on this side the values are
//! an explicit tagged union ([`DynamicValue`]) and an insertion-ordered map
//! ([`PropertySet`]). Conversions to and from the environment-native
//! representation (`serde_json::Value`) are total: every gap is a named
//! [`ValueNotRepresentable`](crate::ConvergeError::ValueNotRepresentable)
//! error, never a silent null.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, value_not_representable};

/// A dynamically-typed property value
///
/// Key order and nesting round-trip unchanged through Get/Set cycles; the
/// engine never interprets individual values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DynamicValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<DynamicValue>),
    Map(PropertySet),
}

impl DynamicValue {
    /// Short type label used in conversion error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            DynamicValue::Null => "null",
            DynamicValue::Bool(_) => "bool",
            DynamicValue::Integer(_) => "integer",
            DynamicValue::Float(_) => "float",
            DynamicValue::String(_) => "string",
            DynamicValue::Sequence(_) => "sequence",
            DynamicValue::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynamicValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DynamicValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert an environment-native value into a [`DynamicValue`].
    pub fn from_json(value: &Value) -> Result<DynamicValue> {
        from_json_at(value, "$")
    }

    /// Convert into the environment-native representation.
    pub fn to_json(&self) -> Result<Value> {
        to_json_at(self, "$")
    }
}

fn from_json_at(value: &Value, path: &str) -> Result<DynamicValue> {
    match value {
        Value::Null => Ok(DynamicValue::Null),
        Value::Bool(b) => Ok(DynamicValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(DynamicValue::Integer(i))
            } else if n.is_u64() {
                // u64 beyond i64::MAX has no lossless representation
                Err(value_not_representable(
                    path,
                    format!("integer {n} is out of the supported signed 64-bit range"),
                ))
            } else if let Some(f) = n.as_f64() {
                Ok(DynamicValue::Float(f))
            } else {
                Err(value_not_representable(
                    path,
                    format!("number {n} has no supported representation"),
                ))
            }
        }
        Value::String(s) => Ok(DynamicValue::String(s.clone())),
        Value::Array(items) => {
            let mut sequence = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                sequence.push(from_json_at(item, &format!("{path}[{index}]"))?);
            }
            Ok(DynamicValue::Sequence(sequence))
        }
        Value::Object(entries) => {
            let mut set = PropertySet::new();
            for (key, item) in entries {
                set.insert(key.clone(), from_json_at(item, &format!("{path}.{key}"))?);
            }
            Ok(DynamicValue::Map(set))
        }
    }
}

fn to_json_at(value: &DynamicValue, path: &str) -> Result<Value> {
    match value {
        DynamicValue::Null => Ok(Value::Null),
        DynamicValue::Bool(b) => Ok(Value::Bool(*b)),
        DynamicValue::Integer(i) => Ok(Value::from(*i)),
        DynamicValue::Float(f) => serde_json::Number::from_f64(*f).map_or_else(
            || {
                Err(value_not_representable(
                    path,
                    format!("non-finite number {f} has no structured representation"),
                ))
            },
            |n| Ok(Value::Number(n)),
        ),
        DynamicValue::String(s) => Ok(Value::String(s.clone())),
        DynamicValue::Sequence(items) => {
            let mut array = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                array.push(to_json_at(item, &format!("{path}[{index}]"))?);
            }
            Ok(Value::Array(array))
        }
        DynamicValue::Map(set) => set_to_json_at(set, path),
    }
}

fn set_to_json_at(set: &PropertySet, path: &str) -> Result<Value> {
    let mut object = serde_json::Map::with_capacity(set.len());
    for (key, item) in set {
        object.insert(key.clone(), to_json_at(item, &format!("{path}.{key}"))?);
    }
    Ok(Value::Object(object))
}

impl From<&str> for DynamicValue {
    fn from(value: &str) -> Self {
        DynamicValue::String(value.to_string())
    }
}

impl From<String> for DynamicValue {
    fn from(value: String) -> Self {
        DynamicValue::String(value)
    }
}

impl From<bool> for DynamicValue {
    fn from(value: bool) -> Self {
        DynamicValue::Bool(value)
    }
}

impl From<i64> for DynamicValue {
    fn from(value: i64) -> Self {
        DynamicValue::Integer(value)
    }
}

impl From<f64> for DynamicValue {
    fn from(value: f64) -> Self {
        DynamicValue::Float(value)
    }
}

impl From<Vec<DynamicValue>> for DynamicValue {
    fn from(value: Vec<DynamicValue>) -> Self {
        DynamicValue::Sequence(value)
    }
}

impl From<PropertySet> for DynamicValue {
    fn from(value: PropertySet) -> Self {
        DynamicValue::Map(value)
    }
}

/// An ordered mapping from unique string keys to [`DynamicValue`]s
///
/// Used for both desired-state input and current-state output. Once handed
/// to the invocation engine for one call it is treated as immutable; values
/// returned to the caller are owned and safe to share across threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet {
    entries: IndexMap<String, DynamicValue>,
}

impl PropertySet {
    pub fn new() -> Self {
        PropertySet {
            entries: IndexMap::new(),
        }
    }

    /// Insert a property, replacing (in place) any existing value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DynamicValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DynamicValue)> {
        self.entries.iter()
    }

    /// Decode an environment-native object into a property set.
    ///
    /// Fails unless `value` is a structured mapping; scalar or sequence
    /// output at the top level is malformed provider output.
    pub fn from_json_object(value: &Value) -> Result<PropertySet> {
        match DynamicValue::from_json(value)? {
            DynamicValue::Map(set) => Ok(set),
            other => Err(value_not_representable(
                "$",
                format!("expected a property mapping, found {}", other.type_name()),
            )),
        }
    }

    /// Encode into the environment-native representation.
    pub fn to_json(&self) -> Result<Value> {
        set_to_json_at(self, "$")
    }
}

impl<K: Into<String>, V: Into<DynamicValue>> FromIterator<(K, V)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        PropertySet {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = (&'a String, &'a DynamicValue);
    type IntoIter = indexmap::map::Iter<'a, String, DynamicValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for PropertySet {
    type Item = (String, DynamicValue);
    type IntoIter = indexmap::map::IntoIter<String, DynamicValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
