/*
[INPUT]:  ClientConfig, XML codec, optional exchange logger, caller data
[OUTPUT]: Signed HTTPS POST and translated Response or OpensrsError
[POS]:    HTTP layer - core client and request pipeline
[UPDATE]: When adding connection options or changing the call flow
*/

use crate::codec::{OpsXmlCodec, XmlCodec};
use crate::http::config::{ClientConfig, SslVerify};
use crate::http::logging::{Direction, ExchangeLogger, TracingExchangeLogger, exchange_label};
use crate::http::signature::RequestSigner;
use crate::http::tls::tls_config;
use crate::http::{OpensrsError, Result};
use crate::payload::Envelope;
use crate::response::Response;
use crate::value::Assoc;
use reqwest::Client;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

const X_USERNAME: &str = "x-username";
const X_SIGNATURE: &str = "x-signature";

/// Builder for [`OpensrsClient`]
#[derive(Debug)]
pub struct OpensrsClientBuilder {
    config: ClientConfig,
    codec: Arc<dyn XmlCodec>,
    logger: Option<Arc<dyn ExchangeLogger>>,
}

impl OpensrsClientBuilder {
    /// Replace the XML codec used for requests and responses
    pub fn codec(mut self, codec: Arc<dyn XmlCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Send exchange log lines to `logger`
    pub fn logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Do not log request and response documents
    pub fn without_logger(mut self) -> Self {
        self.logger = None;
        self
    }

    pub fn build(self) -> Result<OpensrsClient> {
        let config = self.config;
        config.validate()?;
        let url = request_url(&config.server_url()?);

        if config.ssl_verify == SslVerify::None {
            warn!(server = %url, "TLS certificate verification is disabled");
        }
        if config.password.is_some() {
            debug!("password is configured but requests are signed with the key only");
        }

        let tls = tls_config(config.ssl_verify, config.ssl_ciphers.as_deref())?;
        let mut builder = Client::builder()
            .use_preconfigured_tls(tls)
            .pool_max_idle_per_host(0);
        if let Some(timeout) = config.read_timeout() {
            builder = builder.read_timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        let http_client = builder.build().map_err(|err| {
            OpensrsError::Config(format!("failed to build HTTP client: {err}"))
        })?;

        Ok(OpensrsClient {
            http_client,
            signer: RequestSigner::new(config.key.clone()),
            url,
            config,
            codec: self.codec,
            logger: self.logger,
        })
    }
}

/// Client for the OpenSRS XML API
///
/// Each call opens its own connection; the client holds no per-call state and
/// can be shared across tasks.
#[derive(Debug)]
pub struct OpensrsClient {
    http_client: Client,
    config: ClientConfig,
    url: Url,
    signer: RequestSigner,
    codec: Arc<dyn XmlCodec>,
    logger: Option<Arc<dyn ExchangeLogger>>,
}

impl OpensrsClient {
    /// Create a client with the OPS codec and tracing exchange logger
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: ClientConfig) -> OpensrsClientBuilder {
        OpensrsClientBuilder {
            config,
            codec: Arc::new(OpsXmlCodec),
            logger: Some(Arc::new(TracingExchangeLogger)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL every request is posted to
    pub fn request_url(&self) -> &Url {
        &self.url
    }

    /// Send `data` as one signed request and parse the reply
    ///
    /// Transport failures map to `BadResponse`, `Timeout` or `Connection`;
    /// codec errors are returned as raised. Nothing is retried.
    pub async fn call(&self, data: Assoc) -> Result<Response> {
        let label = exchange_label(&data);
        let envelope = Envelope::build(data);
        let codec = self.codec.as_ref();

        let body = envelope.to_xml(codec)?;
        let request_xml = if self.config.sanitize_request {
            envelope.to_sanitized_xml(codec)?
        } else {
            body.clone()
        };
        self.log(Direction::Request, label.as_deref(), &request_xml);

        let headers = request_headers(&self.config.username, &body, &self.signer)?;
        debug!(url = %self.url, bytes = body.len(), "sending OpenSRS request");

        let response = self
            .http_client
            .post(self.url.clone())
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(OpensrsError::from_transport)?;
        let status = response.status();
        let response_xml = response
            .text()
            .await
            .map_err(OpensrsError::from_transport)?;
        debug!(%status, bytes = response_xml.len(), "received OpenSRS response");
        self.log(Direction::Response, label.as_deref(), &response_xml);

        let parsed = codec.parse(&response_xml)?;
        Ok(Response::new(parsed, request_xml, response_xml))
    }

    fn log(&self, direction: Direction, label: Option<&str>, xml: &str) {
        if let Some(logger) = &self.logger {
            logger.log(direction, label, xml);
        }
    }
}

/// Path requests are posted to; an empty path becomes `/`
pub fn request_path(server: &Url) -> &str {
    match server.path() {
        "" => "/",
        path => path,
    }
}

/// Configured server with the resolved path and no query or fragment
pub fn request_url(server: &Url) -> Url {
    let mut url = server.clone();
    let path = request_path(server).to_string();
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Headers sent with every request body
pub fn request_headers(
    username: &str,
    body: &str,
    signer: &RequestSigner,
) -> Result<HeaderMap> {
    let username = HeaderValue::from_str(username).map_err(|err| {
        OpensrsError::Config(format!("username is not a valid header value: {err}"))
    })?;
    let signature = HeaderValue::from_str(&signer.sign(body))
        .map_err(|err| OpensrsError::Config(format!("invalid signature header: {err}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/xml"));
    headers.insert(HeaderName::from_static(X_USERNAME), username);
    headers.insert(HeaderName::from_static(X_SIGNATURE), signature);
    Ok(headers)
}
