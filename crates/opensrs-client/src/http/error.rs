/*
[INPUT]:  Transport failures (reqwest), codec failures, configuration problems
[OUTPUT]: OpensrsError with a closed ErrorKind discriminator and retry hints
[POS]:    Error handling layer - unified error type for the crate
[UPDATE]: When adding error sources or changing transport classification
*/

use crate::codec::CodecError;
use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Message attached to every [`OpensrsError::BadResponse`]
pub const BAD_RESPONSE_HINT: &str = "Received a bad response from OpenSRS. Please check that your IP address is added to the whitelist, and try again.";

/// Main error type for the OpenSRS client
#[derive(Error, Debug)]
pub enum OpensrsError {
    /// The HTTP exchange itself was malformed
    #[error(
        "Received a bad response from OpenSRS. Please check that your IP address is added to the whitelist, and try again."
    )]
    BadResponse(#[source] reqwest::Error),

    /// Read or connect timeout elapsed
    #[error("Request to OpenSRS timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Connection refused, reset or otherwise lost
    #[error("Connection to OpenSRS failed: {0}")]
    Connection(#[source] reqwest::Error),

    /// Raised by the XML codec, passed through as-is
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Flat discriminator over [`OpensrsError`] for pattern matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadResponse,
    Timeout,
    Connection,
    Codec,
    Config,
}

impl OpensrsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OpensrsError::BadResponse(_) => ErrorKind::BadResponse,
            OpensrsError::Timeout(_) => ErrorKind::Timeout,
            OpensrsError::Connection(_) => ErrorKind::Connection,
            OpensrsError::Codec(_) => ErrorKind::Codec,
            OpensrsError::Config(_) | OpensrsError::InvalidUrl(_) => ErrorKind::Config,
        }
    }

    /// Timeouts count as connection errors
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            OpensrsError::Timeout(_) | OpensrsError::Connection(_)
        )
    }

    /// Check if the error is plausibly transient
    ///
    /// The client never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        self.is_connection_error()
    }

    /// Translate a transport failure into the matching error kind
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        let io_kind = io_error_kind(&err);

        if err.is_timeout() || io_kind == Some(io::ErrorKind::TimedOut) {
            return OpensrsError::Timeout(err);
        }

        let connection_lost = matches!(
            io_kind,
            Some(
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::NotConnected
            )
        );
        if connection_lost || err.is_connect() {
            return OpensrsError::Connection(err);
        }

        OpensrsError::BadResponse(err)
    }
}

fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut current = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        current = source.source();
    }
    None
}

/// Result type alias for OpenSRS operations
pub type Result<T> = std::result::Result<T, OpensrsError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_error() -> reqwest::Error {
        reqwest::Client::new()
            .post("not a url")
            .build()
            .expect_err("relative url must fail")
    }

    #[test]
    fn test_bad_response_carries_whitelist_hint() {
        let err = OpensrsError::BadResponse(builder_error());
        assert_eq!(err.to_string(), BAD_RESPONSE_HINT);
        assert!(err.to_string().contains("whitelist"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_kind_discriminator() {
        assert_eq!(
            OpensrsError::Timeout(builder_error()).kind(),
            ErrorKind::Timeout
        );
        assert_eq!(
            OpensrsError::Connection(builder_error()).kind(),
            ErrorKind::Connection
        );
        assert_eq!(
            OpensrsError::Codec(CodecError::Parse("x".into())).kind(),
            ErrorKind::Codec
        );
        assert_eq!(
            OpensrsError::Config("missing key".into()).kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn test_unparseable_url_is_config_kind() {
        let err = OpensrsError::from(url::Url::parse("not a uri").unwrap_err());
        assert!(matches!(err, OpensrsError::InvalidUrl(_)));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_timeout_is_a_connection_error() {
        let timeout = OpensrsError::Timeout(builder_error());
        assert!(timeout.is_connection_error());
        assert!(timeout.is_retryable());

        let bad = OpensrsError::BadResponse(builder_error());
        assert!(!bad.is_connection_error());
        assert!(!bad.is_retryable());
    }

    #[test]
    fn test_codec_error_is_transparent() {
        let err = OpensrsError::from(CodecError::Parse("unexpected end of document".into()));
        assert_eq!(
            err.to_string(),
            CodecError::Parse("unexpected end of document".into()).to_string()
        );
    }

    #[test]
    fn test_io_error_kind_walks_source_chain() {
        #[derive(Debug, Error)]
        #[error("wrapper")]
        struct Wrapper(#[source] io::Error);

        let err = Wrapper(io::Error::from(io::ErrorKind::ConnectionReset));
        assert_eq!(io_error_kind(&err), Some(io::ErrorKind::ConnectionReset));
        assert_eq!(io_error_kind(&OpensrsError::Config("x".into())), None);
    }
}
