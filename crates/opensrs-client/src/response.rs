/*
[INPUT]:  Parsed response mapping, sanitized request XML, raw response body
[OUTPUT]: Immutable call result with convenience accessors
[POS]:    Response layer - value returned by every successful call
[UPDATE]: When adding accessors for common reply fields
*/

use crate::value::{Assoc, Value};
use serde::Serialize;

/// Outcome of one request/response exchange
///
/// The HTTP status is not consulted; success is decided by the reply body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    parsed: Assoc,
    request_xml: String,
    response_xml: String,
}

impl Response {
    pub fn new(parsed: Assoc, request_xml: String, response_xml: String) -> Self {
        Self {
            parsed,
            request_xml,
            response_xml,
        }
    }

    /// The `data_block` mapping of the reply
    pub fn parsed(&self) -> &Assoc {
        &self.parsed
    }

    /// Request document as it was logged (redacted when sanitization is on)
    pub fn request_xml(&self) -> &str {
        &self.request_xml
    }

    /// Raw response body
    pub fn response_xml(&self) -> &str {
        &self.response_xml
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.parsed.get(key)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// `is_success` item equals `1`
    pub fn is_success(&self) -> bool {
        self.text("is_success") == Some("1")
    }

    pub fn response_code(&self) -> Option<&str> {
        self.text("response_code")
    }

    pub fn response_text(&self) -> Option<&str> {
        self.text("response_text")
    }

    /// `response_text` of an unsuccessful reply
    pub fn error_message(&self) -> Option<&str> {
        if self.is_success() {
            None
        } else {
            self.response_text()
        }
    }

    pub fn attributes(&self) -> Option<&Assoc> {
        self.get("attributes").and_then(Value::as_assoc)
    }

    pub fn into_parts(self) -> (Assoc, String, String) {
        (self.parsed, self.request_xml, self.response_xml)
    }
}
