/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public OpenSRS client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod codec;
pub mod http;
pub mod payload;
pub mod response;
pub mod value;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    DEFAULT_SERVER,
    Direction,
    ErrorKind,
    ExchangeLogger,
    OpensrsClient,
    OpensrsClientBuilder,
    OpensrsError,
    RequestSigner,
    Result,
    SslVerify,
    TracingExchangeLogger,
};

pub use codec::{CodecError, OpsXmlCodec, XmlCodec};
pub use payload::{Envelope, PROTOCOL, PROTOCOL_KEY};
pub use response::Response;
pub use value::{Assoc, Value, assoc_from_json};
