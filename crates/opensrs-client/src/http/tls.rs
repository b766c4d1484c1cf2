/*
[INPUT]:  TLS verification mode and optional cipher suite allow-list
[OUTPUT]: rustls client configuration handed to reqwest
[POS]:    HTTP layer - TLS setup for the transport
[UPDATE]: When changing crypto provider, trust roots or cipher naming
*/

use crate::http::config::SslVerify;
use crate::http::{OpensrsError, Result};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, ring, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, RootCertStore, SignatureScheme, SupportedCipherSuite};
use std::sync::Arc;

/// Build the TLS configuration for the given verification mode and ciphers
pub fn tls_config(verify: SslVerify, ciphers: Option<&[String]>) -> Result<rustls::ClientConfig> {
    let provider = Arc::new(crypto_provider(ciphers)?);
    let builder = rustls::ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(|err| OpensrsError::Config(format!("invalid TLS settings: {err}")))?;

    let config = match verify {
        SslVerify::Peer => {
            let roots = RootCertStore {
                roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
            };
            builder.with_root_certificates(roots).with_no_client_auth()
        }
        SslVerify::None => builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate { provider }))
            .with_no_client_auth(),
    };
    Ok(config)
}

/// Names accepted in `ssl_ciphers`
fn supported_cipher_names() -> Vec<String> {
    ring::default_provider()
        .cipher_suites
        .iter()
        .map(suite_name)
        .collect()
}

fn suite_name(suite: &SupportedCipherSuite) -> String {
    format!("{:?}", suite.suite())
}

fn crypto_provider(ciphers: Option<&[String]>) -> Result<CryptoProvider> {
    let mut provider = ring::default_provider();
    let Some(names) = ciphers else {
        return Ok(provider);
    };

    let available = supported_cipher_names();
    if let Some(unknown) = names.iter().find(|name| !available.contains(name)) {
        return Err(OpensrsError::Config(format!(
            "unsupported cipher suite {unknown}; expected one of {}",
            available.join(", ")
        )));
    }

    provider
        .cipher_suites
        .retain(|suite| names.contains(&suite_name(suite)));
    Ok(provider)
}

/// Certificate verifier for `SslVerify::None`
///
/// Handshake signatures are still checked so the session keys are bound to
/// the presented certificate.
#[derive(Debug)]
struct AcceptAnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
