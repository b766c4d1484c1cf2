/*
[INPUT]:  Sanitized request XML, raw response XML, caller object/action
[OUTPUT]: Exchange log lines through a pluggable sink
[POS]:    HTTP layer - request/response traceability
[UPDATE]: When changing log line format or sink contract
*/

use crate::value::Assoc;
use std::fmt::Debug;
use tracing::info;

/// Which half of the exchange is being logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Request => "Request",
            Direction::Response => "Response",
        }
    }
}

/// Sink receiving every request and response document
pub trait ExchangeLogger: Send + Sync + Debug {
    fn log(&self, direction: Direction, label: Option<&str>, xml: &str);
}

/// Default sink emitting `info` events on the `opensrs` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingExchangeLogger;

impl ExchangeLogger for TracingExchangeLogger {
    fn log(&self, direction: Direction, label: Option<&str>, xml: &str) {
        info!(target: "opensrs", "{}\n{}", headline(direction, label), xml);
    }
}

/// `[OpenSRS] Request XML for DOMAIN LOOKUP`
pub fn headline(direction: Direction, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("[OpenSRS] {} XML for {label}", direction.as_str()),
        None => format!("[OpenSRS] {} XML", direction.as_str()),
    }
}

/// `object action` from caller data, when both are present as text
pub fn exchange_label(data: &Assoc) -> Option<String> {
    let object = data.get("object")?.as_str()?;
    let action = data.get("action")?.as_str()?;
    Some(format!("{object} {action}"))
}
