//! JWT payload inspection
//!
//! The client never verifies signatures; it only reads `exp` so it can drop
//! a session before the backend starts answering 401.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::SessionError;

/// The claims the client cares about
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JwtClaims {
    /// Expiry, seconds since the Unix epoch
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl JwtClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Decode the payload segment of a compact JWT
pub fn decode_claims(token: &str) -> Result<JwtClaims, SessionError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => {
            return Err(SessionError::InvalidToken(
                "expected three dot-separated segments".to_string(),
            ))
        }
    };

    // Some issuers keep the padding; the URL-safe engine rejects it.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| SessionError::InvalidToken(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| SessionError::InvalidToken(e.to_string()))
}

/// True when the token cannot be decoded or its `exp` is at or before `now`.
///
/// A token without `exp` never expires on the client side.
pub fn is_token_expired(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.exp.is_some_and(|exp| exp <= now.timestamp()),
        Err(_) => true,
    }
}

#[cfg(test)]
pub(crate) fn make_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{}.{}.signature", header, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_claims() {
        let token = make_token(&json!({"exp": 1_700_000_000, "sub": "42", "role": "Admin"}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, Some(1_700_000_000));
        assert_eq!(claims.sub.as_deref(), Some("42"));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_expiry_compares_to_now() {
        let token = make_token(&json!({"exp": 1_700_000_000}));
        let before = DateTime::from_timestamp(1_699_999_999, 0).unwrap();
        let after = DateTime::from_timestamp(1_700_000_001, 0).unwrap();
        assert!(!is_token_expired(&token, before));
        assert!(is_token_expired(&token, after));
    }

    #[test]
    fn test_malformed_tokens_are_expired() {
        let now = Utc::now();
        assert!(is_token_expired("not-a-jwt", now));
        assert!(is_token_expired("a.!!!.c", now));
        assert!(matches!(decode_claims("a.b"), Err(SessionError::InvalidToken(_))));
    }

    #[test]
    fn test_missing_exp_does_not_expire() {
        let token = make_token(&json!({"sub": "7"}));
        assert!(!is_token_expired(&token, Utc::now()));
    }
}
