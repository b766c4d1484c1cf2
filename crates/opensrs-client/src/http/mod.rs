/*
[INPUT]:  Client configuration, caller data, codec and logger capabilities
[OUTPUT]: Signed HTTPS exchanges and translated results
[POS]:    HTTP layer - transport, signing and error translation
[UPDATE]: When adding transport options or changing the call flow
*/

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod signature;
pub mod tls;

pub use error::{ErrorKind, OpensrsError, Result};
pub use signature::RequestSigner;

pub use client::{OpensrsClient, OpensrsClientBuilder};
pub use config::{ClientConfig, DEFAULT_SERVER, SslVerify};
pub use logging::{Direction, ExchangeLogger, TracingExchangeLogger};
