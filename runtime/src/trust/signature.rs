//! Timestamped HMAC-SHA256 request signatures.
//!
//! A caller signs `"{timestamp}:{registration}:{secret}"` with the shared
//! secret and sends the base64 digest as `X-Hash` alongside the millisecond
//! timestamp in `X-Timestamp`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum clock skew accepted between caller and server.
pub const SIGNATURE_WINDOW_MS: i64 = 5 * 60 * 1000;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Missing authentication headers")]
    Missing,
    #[error("Request timestamp expired")]
    Expired,
    #[error("Invalid request signature")]
    Invalid,
}

/// Signs and verifies requests with a shared secret.
#[derive(Clone)]
pub struct RequestSigner {
    secret: String,
}

impl RequestSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac(&self, timestamp: &str, registration: &str) -> HmacSha256 {
        // HMAC accepts keys of any length.
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("hmac accepts any key length");
        mac.update(format!("{timestamp}:{registration}:{}", self.secret).as_bytes());
        mac
    }

    /// Base64 signature for a timestamp and registration number.
    pub fn sign(&self, timestamp: &str, registration: &str) -> String {
        STANDARD.encode(self.mac(timestamp, registration).finalize().into_bytes())
    }

    /// Check a signature against the current time `now_ms`.
    pub fn verify(
        &self,
        signature: &str,
        timestamp: &str,
        registration: &str,
        now_ms: i64,
    ) -> Result<(), SignatureError> {
        if signature.is_empty() || timestamp.is_empty() {
            return Err(SignatureError::Missing);
        }
        let sent_ms: i64 = timestamp.trim().parse().map_err(|_| SignatureError::Expired)?;
        if (now_ms - sent_ms).abs() > SIGNATURE_WINDOW_MS {
            return Err(SignatureError::Expired);
        }
        let digest = STANDARD
            .decode(signature.trim())
            .map_err(|_| SignatureError::Invalid)?;
        self.mac(timestamp, registration)
            .verify_slice(&digest)
            .map_err(|_| SignatureError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000_000;

    #[test]
    fn test_sign_then_verify() {
        let signer = RequestSigner::new("s3cret");
        let ts = NOW.to_string();
        let sig = signer.sign(&ts, "2022-ag-7693");
        assert_eq!(signer.verify(&sig, &ts, "2022-ag-7693", NOW + 1000), Ok(()));
    }

    #[test]
    fn test_rejects_other_registration_and_secret() {
        let ts = NOW.to_string();
        let sig = RequestSigner::new("s3cret").sign(&ts, "2022-ag-7693");
        assert_eq!(
            RequestSigner::new("s3cret").verify(&sig, &ts, "2022-ag-1", NOW),
            Err(SignatureError::Invalid)
        );
        assert_eq!(
            RequestSigner::new("other").verify(&sig, &ts, "2022-ag-7693", NOW),
            Err(SignatureError::Invalid)
        );
    }

    #[test]
    fn test_window() {
        let signer = RequestSigner::new("k");
        let ts = NOW.to_string();
        let sig = signer.sign(&ts, "");
        assert!(signer.verify(&sig, &ts, "", NOW + SIGNATURE_WINDOW_MS).is_ok());
        assert_eq!(
            signer.verify(&sig, &ts, "", NOW + SIGNATURE_WINDOW_MS + 1),
            Err(SignatureError::Expired)
        );
        assert_eq!(
            signer.verify(&sig, &ts, "", NOW - SIGNATURE_WINDOW_MS - 1),
            Err(SignatureError::Expired)
        );
    }

    #[test]
    fn test_malformed_input() {
        let signer = RequestSigner::new("k");
        assert_eq!(signer.verify("", "1", "", NOW), Err(SignatureError::Missing));
        assert_eq!(
            signer.verify("abc", "yesterday", "", NOW),
            Err(SignatureError::Expired)
        );
        assert_eq!(
            signer.verify("!!not base64!!", &NOW.to_string(), "", NOW),
            Err(SignatureError::Invalid)
        );
    }
}
