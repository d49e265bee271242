use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Replay window in seconds, applied symmetrically: a timestamp more than
/// this far in the past or the future is rejected.
pub const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Verifies the shared-secret HMAC on inbound requests.
///
/// The signed message is the literal bytes `<timestamp>.<raw body>`, where
/// the body is exactly what arrived on the wire. Re-serializing the JSON
/// would break signatures over whitespace and key order, so callers must
/// hand over the untouched request bytes.
pub struct AuthGuard {
    secret: String,
}

impl AuthGuard {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    pub fn verify(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
        now: i64,
    ) -> Result<(), AuthError> {
        let (timestamp, signature) = match (timestamp, signature) {
            (Some(t), Some(s)) => (t, s),
            _ => return Err(AuthError::MissingHeaders),
        };

        let request_time: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| AuthError::StaleTimestamp)?;
        if (now - request_time).abs() > MAX_CLOCK_SKEW_SECS {
            return Err(AuthError::StaleTimestamp);
        }

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);

        let supplied = hex::decode(signature).map_err(|_| AuthError::BadSignature)?;
        mac.verify_slice(&supplied).map_err(|_| AuthError::BadSignature)
    }
}

/// Computes the lowercase hex signature a client should send for the given
/// timestamp and raw body. The extension does the same on its side.
pub fn sign_payload(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
