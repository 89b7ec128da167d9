use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// How far a webhook's timestamp may drift before it is treated as a replay.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Malformed Stripe-Signature header")]
    Malformed,
    #[error("Webhook timestamp outside tolerance")]
    TimestampOutOfTolerance,
    #[error("No matching v1 signature")]
    NoMatch,
}

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// The header carries `t=<unix>,v1=<hex hmac>[,v1=...]`; the signed payload
/// is `"{t}.{body}"` and the MAC is HMAC-SHA256 under the endpoint secret.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse().map_err(|_| SignatureError::Malformed)?);
            }
            Some(("v1", value)) => candidates.push(value),
            _ => {} // ignore unknown schemes (v0 etc.)
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if candidates.is_empty() {
        return Err(SignatureError::Malformed);
    }
    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Malformed)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    for candidate in candidates {
        let Ok(bytes) = hex::decode(candidate) else {
            continue;
        };
        if mac.clone().verify_slice(&bytes).is_ok() {
            return Ok(());
        }
    }

    Err(SignatureError::NoMatch)
}

// ── Event payload (only the fields the handler reads) ──

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: EventObject,
}

#[derive(Debug, Deserialize)]
pub struct EventObject {
    #[serde(default)]
    pub metadata: EventMetadata,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventMetadata {
    pub user_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn sign(payload: &[u8], timestamp: i64, secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_is_accepted() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = 1_700_000_000;
        let header = format!("t={now},v1={}", sign(payload, now, SECRET));

        assert_eq!(verify_signature(payload, &header, SECRET, now), Ok(()));
    }

    #[test]
    fn extra_unknown_schemes_are_ignored() {
        let payload = b"{}";
        let now = 1_700_000_000;
        let header = format!("t={now},v0=deadbeef,v1={}", sign(payload, now, SECRET));

        assert_eq!(verify_signature(payload, &header, SECRET, now), Ok(()));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let payload = b"{}";
        let now = 1_700_000_000;
        let header = format!("t={now},v1={}", sign(payload, now, "other_secret"));

        assert_eq!(
            verify_signature(payload, &header, SECRET, now),
            Err(SignatureError::NoMatch)
        );
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let now = 1_700_000_000;
        let header = format!("t={now},v1={}", sign(b"{\"a\":1}", now, SECRET));

        assert_eq!(
            verify_signature(b"{\"a\":2}", &header, SECRET, now),
            Err(SignatureError::NoMatch)
        );
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let payload = b"{}";
        let then = 1_700_000_000;
        let header = format!("t={then},v1={}", sign(payload, then, SECRET));

        assert_eq!(
            verify_signature(payload, &header, SECRET, then + SIGNATURE_TOLERANCE_SECS + 1),
            Err(SignatureError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn missing_timestamp_is_malformed() {
        assert_eq!(
            verify_signature(b"{}", "v1=abcdef", SECRET, 0),
            Err(SignatureError::Malformed)
        );
    }

    #[test]
    fn event_metadata_deserializes() {
        let body = serde_json::json!({
            "type": "checkout.session.completed",
            "data": { "object": { "metadata": {
                "user_id": "7f3f36c5-6f61-4fb5-a6a3-7e64ec4a2f45",
                "payment_id": "0b9f9ef0-07c4-4ac0-b06e-0cb41444c5c2"
            }}}
        });

        let event: WebhookEvent = serde_json::from_value(body).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
        assert!(event.data.object.metadata.payment_id.is_some());
    }
}
