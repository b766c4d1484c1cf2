/*
[INPUT]:  Caller data mapping
[OUTPUT]: Immutable request envelope with the protocol tag, plus redacted copies
[POS]:    Payload layer - envelope construction before serialization
[UPDATE]: When the protocol tag or the redacted key set changes
*/

use crate::codec::{CodecError, XmlCodec};
use crate::value::{Assoc, Value};
use tracing::warn;

pub const PROTOCOL_KEY: &str = "protocol";
pub const PROTOCOL: &str = "XCP";

/// Replacement written in place of secret-bearing values
pub const FILTERED: &str = "[FILTERED]";

/// Item keys whose values never leave the process in logs or results
pub const SENSITIVE_KEYS: &[&str] = &[
    "reg_username",
    "reg_password",
    "password",
    "key",
    "private_key",
    "cc_number",
    "cc_cvv",
];

/// Caller fields merged with the fixed protocol tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    data: Assoc,
}

impl Envelope {
    /// Merge the protocol tag into caller data; a caller-supplied tag is replaced
    pub fn build(mut data: Assoc) -> Self {
        if let Some(previous) = data.insert(PROTOCOL_KEY.to_string(), Value::from(PROTOCOL)) {
            if previous.as_str() != Some(PROTOCOL) {
                warn!(?previous, "caller-supplied protocol tag replaced");
            }
        }
        Self { data }
    }

    pub fn data(&self) -> &Assoc {
        &self.data
    }

    /// Copy of the envelope with every sensitive item replaced by [`FILTERED`]
    pub fn redacted(&self) -> Assoc {
        redact_assoc(&self.data)
    }

    /// Serialize the envelope as it goes on the wire
    pub fn to_xml(&self, codec: &dyn XmlCodec) -> Result<String, CodecError> {
        codec.build(&self.data)
    }

    /// Serialize the envelope for logs and results
    pub fn to_sanitized_xml(&self, codec: &dyn XmlCodec) -> Result<String, CodecError> {
        codec.build(&self.redacted())
    }
}

fn redact_assoc(assoc: &Assoc) -> Assoc {
    assoc
        .iter()
        .map(|(key, value)| {
            let value = if SENSITIVE_KEYS.contains(&key.as_str()) {
                Value::from(FILTERED)
            } else {
                redact_value(value)
            };
            (key.clone(), value)
        })
        .collect()
}

fn redact_value(value: &Value) -> Value {
    match value {
        Value::Text(_) => value.clone(),
        Value::Assoc(assoc) => Value::Assoc(redact_assoc(assoc)),
        Value::Array(items) => Value::Array(items.iter().map(redact_value).collect()),
    }
}
