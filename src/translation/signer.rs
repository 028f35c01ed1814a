//! OCI API-key request signing.
//!
//! OCI authenticates API calls with an HTTP `Signature` header: an RSA-SHA256
//! signature over a fixed list of request headers, keyed by
//! `{tenancy}/{user}/{fingerprint}`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use reqwest::Url;
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::{Digest, Sha256};
use std::fmt;

use super::client::ModelError;

/// Headers covered by the signature of a request with a body, in order.
pub const SIGNED_HEADERS: &str =
    "date (request-target) host x-content-sha256 content-type content-length";

const CONTENT_TYPE: &str = "application/json";

/// Header values to attach to a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub date: String,
    pub content_sha256: String,
    pub content_length: usize,
    pub authorization: String,
}

/// Signs JSON POST requests with an OCI API key.
#[derive(Clone)]
pub struct RequestSigner {
    key_id: String,
    signing_key: SigningKey<Sha256>,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Builds a signer from a PEM private key (PKCS#8 or PKCS#1).
    pub fn new(key_id: impl Into<String>, private_key_pem: &str) -> Result<Self, ModelError> {
        let key = RsaPrivateKey::from_pkcs8_pem(private_key_pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(private_key_pem))
            .map_err(|e| ModelError::Internal(format!("unreadable RSA private key: {e}")))?;

        Ok(Self {
            key_id: key_id.into(),
            signing_key: SigningKey::<Sha256>::new(key),
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Signs a JSON POST of `body` to `url` at time `now`.
    pub fn sign(
        &self,
        url: &Url,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<SignedHeaders, ModelError> {
        let date = http_date(now);
        let content_sha256 = content_sha256(body);
        let signing_string = signing_string(
            &date,
            &request_target("post", url),
            &host_header(url)?,
            &content_sha256,
            body.len(),
        );

        let signature = self
            .signing_key
            .try_sign(signing_string.as_bytes())
            .map_err(|e| ModelError::Internal(format!("request signing failed: {e}")))?;

        let authorization = format!(
            "Signature version=\"1\",keyId=\"{}\",algorithm=\"rsa-sha256\",headers=\"{SIGNED_HEADERS}\",signature=\"{}\"",
            self.key_id,
            STANDARD.encode(signature.to_bytes())
        );

        Ok(SignedHeaders {
            date,
            content_sha256,
            content_length: body.len(),
            authorization,
        })
    }
}

/// RFC 7231 `Date` header value, always in GMT.
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Base64 SHA-256 of the request body, for `x-content-sha256`.
pub fn content_sha256(body: &[u8]) -> String {
    STANDARD.encode(Sha256::digest(body))
}

/// Lowercase method plus path and query.
pub fn request_target(method: &str, url: &Url) -> String {
    let method = method.to_ascii_lowercase();
    match url.query() {
        Some(query) => format!("{method} {}?{query}", url.path()),
        None => format!("{method} {}", url.path()),
    }
}

/// `Host` header as the HTTP client sends it: port only when non-default.
pub fn host_header(url: &Url) -> Result<String, ModelError> {
    let host = url
        .host_str()
        .ok_or_else(|| ModelError::Internal(format!("endpoint has no host: {url}")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// The newline-joined text that gets signed, one `name: value` per header.
pub fn signing_string(
    date: &str,
    request_target: &str,
    host: &str,
    content_sha256: &str,
    content_length: usize,
) -> String {
    format!(
        "date: {date}\n\
         (request-target): {request_target}\n\
         host: {host}\n\
         x-content-sha256: {content_sha256}\n\
         content-type: {CONTENT_TYPE}\n\
         content-length: {content_length}"
    )
}
