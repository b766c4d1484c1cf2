/*
[INPUT]:  Serialized request body and the reseller private key
[OUTPUT]: X-Signature header value (lowercase hex)
[POS]:    HTTP layer - request signing for every call
[UPDATE]: When the registrar changes its signing scheme
*/

use md5::{Digest, Md5};

/// Signs request bodies with the registrar's double-MD5 scheme
///
/// `md5_hex(md5_hex(body + key) + key)`. The scheme is fixed by the remote
/// API; any deviation and every request is rejected.
#[derive(Clone)]
pub struct RequestSigner {
    key: String,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner").finish_non_exhaustive()
    }
}

impl RequestSigner {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Signature over the exact body bytes that will be transmitted
    pub fn sign(&self, body: &str) -> String {
        sign(body, &self.key)
    }
}

/// Compute the request signature for `body` with `key`
pub fn sign(body: &str, key: &str) -> String {
    let inner = md5_hex(&[body.as_bytes(), key.as_bytes()]);
    md5_hex(&[inner.as_bytes(), key.as_bytes()])
}

fn md5_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}
