/*
[INPUT]:  Caller-supplied fields (scalars, nested maps, sequences, JSON values)
[OUTPUT]: Codec-neutral value tree used for envelopes and parsed responses
[POS]:    Data model - shared by payload builder, codec and response
[UPDATE]: When adding new conversions or value shapes
*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key/value mapping carried on the wire as an associative container
pub type Assoc = BTreeMap<String, Value>;

/// A single node of request or response data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Array(Vec<Value>),
    Assoc(Assoc),
}

impl Value {
    /// Text content if this is a scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_assoc(&self) -> Option<&Assoc> {
        match self {
            Value::Assoc(assoc) => Some(assoc),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    /// The registrar encodes flags as "1"/"0"
    fn from(value: bool) -> Self {
        Value::Text(if value { "1" } else { "0" }.to_string())
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Text(value.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u16, u32, u64, usize, f64);

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Assoc> for Value {
    fn from(value: Assoc) -> Self {
        Value::Assoc(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Text(String::new()),
            serde_json::Value::Bool(flag) => Value::from(flag),
            serde_json::Value::Number(number) => Value::Text(number.to_string()),
            serde_json::Value::String(text) => Value::Text(text),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Assoc(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Convert a JSON object into an [`Assoc`]; non-object values yield `None`
pub fn assoc_from_json(value: serde_json::Value) -> Option<Assoc> {
    match Value::from(value) {
        Value::Assoc(assoc) => Some(assoc),
        _ => None,
    }
}
