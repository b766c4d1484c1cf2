/*
[INPUT]:  YAML configuration or programmatic settings
[OUTPUT]: Validated connection parameters shared read-only by every call
[POS]:    HTTP layer - client configuration surface
[UPDATE]: When adding connection options or changing defaults
*/

use crate::http::{OpensrsError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Production reseller endpoint
pub const DEFAULT_SERVER: &str = "https://rr-n1-tor.opensrs.net:55443/";

/// TLS peer verification mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SslVerify {
    /// Verify the server certificate chain against the webpki roots
    #[default]
    Peer,
    /// Accept any server certificate
    None,
}

/// Connection parameters for an OpenSRS client
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Endpoint URI; the path defaults to `/` when empty
    pub server: String,
    pub username: String,
    /// Accepted for compatibility; requests are signed with `key` only
    pub password: Option<String>,
    /// Reseller private key used for the X-Signature header
    pub key: String,
    /// Read timeout, also the connect timeout unless `open_timeout` is set
    #[serde(with = "duration_secs")]
    pub timeout: Option<Duration>,
    #[serde(with = "duration_secs")]
    pub open_timeout: Option<Duration>,
    pub ssl_verify: SslVerify,
    /// IANA cipher suite names, e.g. `TLS13_AES_256_GCM_SHA384`
    pub ssl_ciphers: Option<Vec<String>>,
    /// Redact secret-bearing items in logged and returned request XML
    pub sanitize_request: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            username: String::new(),
            password: None,
            key: String::new(),
            timeout: None,
            open_timeout: None,
            ssl_verify: SslVerify::default(),
            ssl_ciphers: None,
            sanitize_request: false,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("open_timeout", &self.open_timeout)
            .field("ssl_verify", &self.ssl_verify)
            .field("ssl_ciphers", &self.ssl_ciphers)
            .field("sanitize_request", &self.sanitize_request)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration for `server` with the given credentials
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    /// Parse configuration from YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|err| OpensrsError::Config(format!("invalid configuration: {err}")))
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| OpensrsError::Config(format!("cannot read {path}: {err}")))?;
        Self::from_yaml_str(&content)
    }

    /// Parsed endpoint; must carry an http(s) scheme and a host
    pub fn server_url(&self) -> Result<Url> {
        let url = Url::parse(&self.server)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OpensrsError::Config(format!(
                "unsupported scheme in server URI: {}",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(OpensrsError::Config(format!(
                "server URI has no host: {}",
                self.server
            )));
        }
        Ok(url)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Explicit open timeout, falling back to the read timeout
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.open_timeout.or(self.timeout)
    }

    /// Check the configuration before any connection is attempted
    pub fn validate(&self) -> Result<()> {
        self.server_url()?;
        if self.username.is_empty() {
            return Err(OpensrsError::Config("username is required".to_string()));
        }
        if self.key.is_empty() {
            return Err(OpensrsError::Config("key is required".to_string()));
        }
        if let Some(ciphers) = &self.ssl_ciphers {
            if ciphers.is_empty() {
                return Err(OpensrsError::Config(
                    "ssl_ciphers must name at least one suite".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Optional durations written as (fractional) seconds
mod duration_secs {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(|secs| Duration::try_from_secs_f64(secs).map_err(D::Error::custom))
            .transpose()
    }
}
