use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{SignatureResult, Signer};
use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use std::collections::HashMap;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const TIMESTAMP_HEADER: &str = "HMAC-Timestamp";

/// qTrade HMAC-SHA256 request signer
///
/// The signed payload is five newline-joined lines: method, request path
/// with query, timestamp, body (empty for GET) and the API secret. The MAC
/// is keyed with the secret and sent base64 encoded as
/// `Authorization: HMAC-SHA256 <key>:<signature>`.
pub struct QtradeSigner {
    api_key: String,
    secret_key: Secret<String>,
}

impl std::fmt::Debug for QtradeSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QtradeSigner")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl QtradeSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key: Secret::new(secret_key),
        }
    }

    fn signing_payload(
        &self,
        method: &str,
        request_path: &str,
        timestamp: u64,
        body: &str,
    ) -> String {
        [
            method,
            request_path,
            &timestamp.to_string(),
            body,
            self.secret_key.expose_secret(),
        ]
        .join("\n")
    }

    /// Base64 HMAC-SHA256 of the signing payload
    pub fn generate_signature(
        &self,
        method: &str,
        request_path: &str,
        timestamp: u64,
        body: &str,
    ) -> Result<String, ExchangeError> {
        let payload = self.signing_payload(method, request_path, timestamp, body);

        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret_key.expose_secret().as_bytes())
            .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
        mac.update(payload.as_bytes());

        Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl Signer for QtradeSigner {
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        let request_path = if query_string.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}?{}", endpoint, query_string)
        };
        let body = std::str::from_utf8(body)
            .map_err(|e| ExchangeError::InvalidParameters(format!("Body is not UTF-8: {}", e)))?;

        let signature = self.generate_signature(method, &request_path, timestamp, body)?;

        let mut headers = HashMap::new();
        headers.insert(
            AUTHORIZATION_HEADER.to_string(),
            format!("HMAC-SHA256 {}:{}", self.api_key, signature),
        );
        headers.insert(TIMESTAMP_HEADER.to_string(), timestamp.to_string());
        if method.eq_ignore_ascii_case("POST") {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        Ok(headers)
    }
}
