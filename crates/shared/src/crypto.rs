//! Payment-gateway webhook signature verification.
//!
//! The gateway signs each webhook delivery with HMAC-SHA256 over
//! `"{timestamp}.{body}"` and sends the result in a
//! `t={timestamp},v1={hex}` header. Verification recomputes the MAC and
//! rejects stale timestamps to bound replay windows.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a signed webhook, in seconds.
pub const DEFAULT_SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Error type for signature operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Malformed signature header")]
    MalformedHeader,

    #[error("Signature does not match payload")]
    InvalidSignature,

    #[error("Signature timestamp outside tolerance window")]
    TimestampOutOfTolerance,

    #[error("Invalid signing key")]
    InvalidKey,
}

/// Computes the hex HMAC-SHA256 signature for a timestamped payload.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &str) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Builds a signature header for a timestamped payload.
pub fn signature_header(
    secret: &str,
    timestamp: i64,
    payload: &str,
) -> Result<String, SignatureError> {
    let signature = sign_payload(secret, timestamp, payload)?;
    Ok(format!("t={},v1={}", timestamp, signature))
}

/// Verifies a `t={timestamp},v1={hex}` signature header against a payload.
///
/// `now` is the current Unix timestamp; deliveries older (or newer) than
/// `tolerance_secs` are rejected before the MAC is checked.
pub fn verify_signature_header(
    secret: &str,
    header: &str,
    payload: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), SignatureError> {
    let (timestamp, provided) = parse_signature_header(header)?;

    if (now - timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let provided_bytes = hex::decode(provided).map_err(|_| SignatureError::MalformedHeader)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());

    // verify_slice is constant-time
    mac.verify_slice(&provided_bytes)
        .map_err(|_| SignatureError::InvalidSignature)
}

fn parse_signature_header(header: &str) -> Result<(i64, &str), SignatureError> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        match part.split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| SignatureError::MalformedHeader)?,
                );
            }
            Some(("v1", value)) => signature = Some(value),
            _ => {}
        }
    }

    match (timestamp, signature) {
        (Some(t), Some(s)) => Ok((t, s)),
        _ => Err(SignatureError::MalformedHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const PAYLOAD: &str = r#"{"id":"evt_1","type":"checkout.session.completed"}"#;

    #[test]
    fn test_sign_payload_is_deterministic() {
        let sig1 = sign_payload(SECRET, 1_700_000_000, PAYLOAD).unwrap();
        let sig2 = sign_payload(SECRET, 1_700_000_000, PAYLOAD).unwrap();
        assert_eq!(sig1, sig2);
        assert_eq!(sig1.len(), 64);
    }

    #[test]
    fn test_signature_depends_on_timestamp() {
        let sig1 = sign_payload(SECRET, 1_700_000_000, PAYLOAD).unwrap();
        let sig2 = sign_payload(SECRET, 1_700_000_001, PAYLOAD).unwrap();
        assert_ne!(sig1, sig2);
    }

    #[test]
    fn test_verify_valid_header() {
        let now = 1_700_000_000;
        let header = signature_header(SECRET, now, PAYLOAD).unwrap();
        assert!(verify_signature_header(SECRET, &header, PAYLOAD, now, 300).is_ok());
    }

    #[test]
    fn test_verify_within_tolerance() {
        let now = 1_700_000_000;
        let header = signature_header(SECRET, now - 299, PAYLOAD).unwrap();
        assert!(verify_signature_header(SECRET, &header, PAYLOAD, now, 300).is_ok());
    }

    #[test]
    fn test_verify_rejects_stale_timestamp() {
        let now = 1_700_000_000;
        let header = signature_header(SECRET, now - 301, PAYLOAD).unwrap();
        assert_eq!(
            verify_signature_header(SECRET, &header, PAYLOAD, now, 300),
            Err(SignatureError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let now = 1_700_000_000;
        let header = signature_header("whsec_other", now, PAYLOAD).unwrap();
        assert_eq!(
            verify_signature_header(SECRET, &header, PAYLOAD, now, 300),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let now = 1_700_000_000;
        let header = signature_header(SECRET, now, PAYLOAD).unwrap();
        let tampered = r#"{"id":"evt_1","type":"invoice.payment_failed"}"#;
        assert_eq!(
            verify_signature_header(SECRET, &header, tampered, now, 300),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn test_malformed_headers() {
        let now = 1_700_000_000;
        for header in [
            "",
            "v1=abcdef",
            "t=123",
            "t=abc,v1=def",
            "timestamp=1,signature=2",
        ] {
            assert_eq!(
                verify_signature_header(SECRET, header, PAYLOAD, now, 300),
                Err(SignatureError::MalformedHeader),
                "header {:?} should be malformed",
                header
            );
        }
    }

    #[test]
    fn test_non_hex_signature_is_malformed() {
        let now = 1_700_000_000;
        let header = format!("t={},v1=zzzz", now);
        assert_eq!(
            verify_signature_header(SECRET, &header, PAYLOAD, now, 300),
            Err(SignatureError::MalformedHeader)
        );
    }

    #[test]
    fn test_header_order_does_not_matter() {
        let now = 1_700_000_000;
        let signature = sign_payload(SECRET, now, PAYLOAD).unwrap();
        let header = format!("v1={},t={}", signature, now);
        assert!(verify_signature_header(SECRET, &header, PAYLOAD, now, 300).is_ok());
    }
}
